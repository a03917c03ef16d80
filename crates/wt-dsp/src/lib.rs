//! Waveform reduction core for wavetrace.
//!
//! Reduces an interleaved sample stream to a fixed number of per-pixel
//! amplitude values in `[0, 1]`. Format decoding and document output live
//! in the surrounding crates; this one is pure arithmetic over a sample
//! source.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod reduce;
mod sample;
mod selector;
mod source;

pub use reduce::{
    reduce_waveform, AmplitudeScale, ChannelWaveform, ReduceParams, Reduction, Waveform, DB_FLOOR,
};
pub use sample::Sample;
pub use selector::{ChannelSelector, UnknownSelector};
pub use source::{MemorySource, SampleSource};

use core::fmt;

/// Error type for waveform reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceError {
    /// The source has no frames, or the point count clamps to zero
    EmptyInput,
    /// A two-channel selector was applied against the wrong channel count
    ChannelMismatch {
        selector: ChannelSelector,
        channels: u16,
    },
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReduceError::EmptyInput => write!(f, "input has no frames to reduce"),
            ReduceError::ChannelMismatch { selector, channels } => write!(
                f,
                "channel '{}' requires two input channels, input has {}",
                selector, channels
            ),
        }
    }
}
