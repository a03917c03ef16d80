//! WAV decoding for PCM and IEEE-float audio.

use crate::FormatError;
use wt_dsp::{MemorySource, SampleSource};

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// A decoded WAV file: stream parameters plus an owned sample source.
#[derive(Debug)]
pub struct DecodedWav {
    pub sample_rate: u32,
    pub samples: DecodedSamples,
}

/// Sample data in its native representation.
///
/// PCM files decode to `i16` (8-bit input is recentred and widened), IEEE
/// float files to `f32`. The reducer is generic over the representation,
/// so callers dispatch on this enum once and stay monomorphic inside.
#[derive(Debug)]
pub enum DecodedSamples {
    Int16(MemorySource<i16>),
    Float32(MemorySource<f32>),
}

impl DecodedWav {
    pub fn channels(&self) -> u16 {
        match &self.samples {
            DecodedSamples::Int16(source) => source.channels(),
            DecodedSamples::Float32(source) => source.channels(),
        }
    }

    pub fn frames(&self) -> usize {
        match &self.samples {
            DecodedSamples::Int16(source) => source.frames(),
            DecodedSamples::Float32(source) => source.frames(),
        }
    }

    /// Duration in whole seconds, truncating.
    pub fn duration_secs(&self) -> u64 {
        self.frames() as u64 / self.sample_rate as u64
    }
}

/// Decode a WAV file from raw bytes.
pub fn load_wav(data: &[u8]) -> Result<DecodedWav, FormatError> {
    let header = parse_header(data)?;
    let end = (header.data_offset + header.data_size).min(data.len());
    let raw = &data[header.data_offset..end];

    let samples = match (header.format, header.bits_per_sample) {
        (FORMAT_PCM, 8) => DecodedSamples::Int16(MemorySource::new(
            read_8bit(raw),
            header.num_channels,
        )),
        (FORMAT_PCM, 16) => DecodedSamples::Int16(MemorySource::new(
            read_16bit(raw),
            header.num_channels,
        )),
        (FORMAT_IEEE_FLOAT, 32) => DecodedSamples::Float32(MemorySource::new(
            read_float32(raw),
            header.num_channels,
        )),
        _ => return Err(FormatError::UnsupportedEncoding),
    };

    Ok(DecodedWav {
        sample_rate: header.sample_rate,
        samples,
    })
}

struct WavHeader {
    format: u16,
    num_channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data_offset: usize,
    data_size: usize,
}

fn parse_header(data: &[u8]) -> Result<WavHeader, FormatError> {
    if data.len() < 44 {
        return Err(FormatError::UnexpectedEof);
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let mut pos = 12;
    let mut fmt: Option<(u16, u16, u32, u16)> = None;
    let mut data_chunk: Option<(usize, usize)> = None;

    while pos + 8 <= data.len() {
        let chunk_id = &data[pos..pos + 4];
        let chunk_size = read_u32_le(data, pos + 4) as usize;

        if chunk_id == b"fmt " && chunk_size >= 16 {
            let format = read_u16_le(data, pos + 8);
            let channels = read_u16_le(data, pos + 10);
            let rate = read_u32_le(data, pos + 12);
            let bits = read_u16_le(data, pos + 22);
            fmt = Some((format, channels, rate, bits));
        } else if chunk_id == b"data" {
            data_chunk = Some((pos + 8, chunk_size));
        }

        pos += 8 + chunk_size;
        if pos % 2 != 0 {
            pos += 1;
        }
    }

    let (format, num_channels, sample_rate, bits_per_sample) =
        fmt.ok_or(FormatError::InvalidHeader)?;
    let (data_offset, data_size) = data_chunk.ok_or(FormatError::InvalidHeader)?;

    if format != FORMAT_PCM && format != FORMAT_IEEE_FLOAT {
        return Err(FormatError::UnsupportedEncoding);
    }
    if !(1..=2).contains(&num_channels) {
        return Err(FormatError::UnsupportedEncoding);
    }
    if sample_rate == 0 {
        return Err(FormatError::InvalidHeader);
    }

    Ok(WavHeader {
        format,
        num_channels,
        sample_rate,
        bits_per_sample,
        data_offset,
        data_size,
    })
}

/// 8-bit WAV is unsigned with the midpoint at 128; recentre and widen so
/// full scale matches the 16-bit representation.
fn read_8bit(raw: &[u8]) -> Vec<i16> {
    raw.iter().map(|&b| (b as i16 - 128) * 256).collect()
}

fn read_16bit(raw: &[u8]) -> Vec<i16> {
    raw.chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

fn read_float32(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
