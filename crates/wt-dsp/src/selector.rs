//! Channel selectors: how one scalar is derived from a multi-channel frame.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::sample::Sample;
use crate::ReduceError;

/// Rule for combining one interleaved frame into a single sample value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelSelector {
    /// First channel; valid for mono and stereo input
    Left,
    /// Second channel
    Right,
    /// Average of both channels
    Mid,
    /// Half-difference of both channels
    Side,
    /// Smaller of both channel values
    Min,
    /// Larger of both channel values
    Max,
}

impl ChannelSelector {
    /// Returns true if the selector needs two input channels.
    pub fn requires_stereo(self) -> bool {
        !matches!(self, ChannelSelector::Left)
    }

    /// Wire name, used as the JSON key for this selector's sequence.
    pub fn name(self) -> &'static str {
        match self {
            ChannelSelector::Left => "left",
            ChannelSelector::Right => "right",
            ChannelSelector::Mid => "mid",
            ChannelSelector::Side => "side",
            ChannelSelector::Min => "min",
            ChannelSelector::Max => "max",
        }
    }

    /// Reduce one interleaved frame (`channels` consecutive samples) to a
    /// single value.
    ///
    /// Stereo-only selectors fail against any other channel count; the
    /// reducer filters its selector list before the per-frame loop, so this
    /// only fires on direct misuse.
    pub fn reduce<S: Sample>(self, frame: &[S], channels: u16) -> Result<S, ReduceError> {
        if self.requires_stereo() && channels != 2 {
            return Err(ReduceError::ChannelMismatch {
                selector: self,
                channels,
            });
        }
        Ok(match self {
            ChannelSelector::Left => frame[0],
            ChannelSelector::Right => frame[1],
            ChannelSelector::Mid => S::mid(frame[0], frame[1]),
            ChannelSelector::Side => S::side(frame[0], frame[1]),
            ChannelSelector::Min => S::min_of(frame[0], frame[1]),
            ChannelSelector::Max => S::max_of(frame[0], frame[1]),
        })
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a selector token does not name a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSelector(pub String);

impl fmt::Display for UnknownSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown channel '{}'", self.0)
    }
}

impl FromStr for ChannelSelector {
    type Err = UnknownSelector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(ChannelSelector::Left),
            "right" => Ok(ChannelSelector::Right),
            "mid" => Ok(ChannelSelector::Mid),
            "side" => Ok(ChannelSelector::Side),
            "min" => Ok(ChannelSelector::Min),
            "max" => Ok(ChannelSelector::Max),
            other => Err(UnknownSelector(String::from(other))),
        }
    }
}
