//! Audio file decoding and document output for wavetrace.
//!
//! Parses WAV files into in-memory sample sources for the reducer, and
//! serializes reduced waveforms as JSON documents.

mod json_doc;
mod wav_format;

pub use json_doc::{document_to_string, write_document, Document};
pub use wav_format::{load_wav, DecodedSamples, DecodedWav};

use std::fmt;

/// Error type for format parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Invalid file header or magic bytes
    InvalidHeader,
    /// Unexpected end of file
    UnexpectedEof,
    /// Sample encoding this decoder does not handle
    UnsupportedEncoding,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidHeader => write!(f, "invalid or missing WAV header"),
            FormatError::UnexpectedEof => write!(f, "unexpected end of file"),
            FormatError::UnsupportedEncoding => write!(f, "unsupported sample encoding"),
        }
    }
}
