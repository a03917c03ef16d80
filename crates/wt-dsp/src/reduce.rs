//! Waveform reduction: sample stream in, per-pixel amplitudes out.
//!
//! The reducer walks the source once, front to back, grouping frames into
//! one block per output pixel. Each retained selector gets the block's
//! peak absolute value, rescaled into `[0, 1]` on either a linear or a
//! decibel axis.

use alloc::vec;
use alloc::vec::Vec;

use crate::sample::Sample;
use crate::selector::ChannelSelector;
use crate::source::SampleSource;
use crate::ReduceError;

/// dB value substituted for a zero-magnitude peak.
///
/// A finite sentinel rather than `-inf`; any sane `db_min` clamps it
/// to 0.0.
pub const DB_FLOOR: f32 = -9999.9;

/// Output range mapping for reduced peaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmplitudeScale {
    /// `[0, full_scale]` mapped linearly onto `[0, 1]`
    Linear,
    /// Peak over full scale in decibels, `[db_min, db_max]` mapped onto
    /// `[0, 1]`; requires `db_min < db_max`
    Decibel { db_min: f32, db_max: f32 },
}

/// Parameters for one reduction run. Fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ReduceParams {
    /// Requested output points per selector; clamped to the frame count
    pub points: usize,
    /// Selectors to compute, in output order
    pub selectors: Vec<ChannelSelector>,
    pub scale: AmplitudeScale,
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self {
            points: 800,
            selectors: vec![ChannelSelector::Left, ChannelSelector::Right],
            scale: AmplitudeScale::Linear,
        }
    }
}

/// One selector's ordered per-pixel values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelWaveform {
    pub selector: ChannelSelector,
    pub values: Vec<f32>,
}

/// Output of a completed reduction.
///
/// All sequences have equal length: the requested point count clamped to
/// the source's frame count.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Per-selector sequences, in request order
    pub channels: Vec<ChannelWaveform>,
    /// Selectors dropped because the input had too few channels
    pub dropped: Vec<ChannelSelector>,
}

/// Outcome of a reduction run.
#[derive(Debug, Clone, PartialEq)]
pub enum Reduction {
    Complete(Waveform),
    /// The progress callback requested an abort; partial values are
    /// discarded by the caller.
    Cancelled,
}

/// Reduce `source` to `params.points` values per retained selector.
///
/// Blocks until done; the only suspension point is `on_progress`, called
/// once per hundredth of the pixels with the percentage so far, and once
/// with 100 after the loop. Returning `false` from the callback aborts the
/// run and yields [`Reduction::Cancelled`] without reading further frames.
///
/// Selectors that need two channels are dropped (not failed) against mono
/// input and reported in the result; an empty retained set short-circuits
/// to an empty result. A source with zero frames or a zero point request
/// is an error.
pub fn reduce_waveform<S, Src>(
    source: &mut Src,
    params: &ReduceParams,
    mut on_progress: impl FnMut(usize) -> bool,
) -> Result<Reduction, ReduceError>
where
    S: Sample,
    Src: SampleSource<S>,
{
    let total_frames = source.frames();
    if total_frames == 0 || params.points == 0 {
        return Err(ReduceError::EmptyInput);
    }

    let channels = source.channels();
    let points = params.points.min(total_frames);
    // Computed once from truncating division; later pixels do not
    // compensate for rounding drift, so trailing frames may go unread.
    let frames_per_pixel = (total_frames / points).max(1);
    let progress_step = (points / 100).max(1);

    let mut dropped = Vec::new();
    let mut retained = Vec::new();
    for &selector in &params.selectors {
        if selector.requires_stereo() && channels == 1 {
            dropped.push(selector);
        } else {
            retained.push(selector);
        }
    }
    if retained.is_empty() {
        return Ok(Reduction::Complete(Waveform {
            channels: Vec::new(),
            dropped,
        }));
    }

    let mut outputs: Vec<Vec<f32>> = retained
        .iter()
        .map(|_| Vec::with_capacity(points))
        .collect();
    let mut block = vec![S::ZERO; frames_per_pixel * channels as usize];

    for pixel in 0..points {
        let frames_read = source.read_frames(&mut block, frames_per_pixel);
        let frame_data = &block[..frames_read * channels as usize];

        for (&selector, values) in retained.iter().zip(outputs.iter_mut()) {
            // Peak tracking starts from zero magnitude: a silent block
            // yields 0 linear, or the floor in dB mode.
            let mut peak = S::ZERO;
            for frame in frame_data.chunks_exact(channels as usize) {
                let sample = selector.reduce(frame, channels)?;
                peak = S::max_of(peak, sample.amplitude());
            }
            values.push(rescale(peak, params.scale));
        }

        if pixel % progress_step == 0 && !on_progress(100 * pixel / points) {
            return Ok(Reduction::Cancelled);
        }
    }

    if !on_progress(100) {
        return Ok(Reduction::Cancelled);
    }

    let sequences = retained
        .into_iter()
        .zip(outputs)
        .map(|(selector, values)| ChannelWaveform { selector, values })
        .collect();
    Ok(Reduction::Complete(Waveform {
        channels: sequences,
        dropped,
    }))
}

fn rescale<S: Sample>(peak: S, scale: AmplitudeScale) -> f32 {
    match scale {
        AmplitudeScale::Linear => map_range(peak.to_f32(), 0.0, S::FULL_SCALE, 0.0, 1.0),
        AmplitudeScale::Decibel { db_min, db_max } => {
            map_range(to_db(peak.to_f32() / S::FULL_SCALE), db_min, db_max, 0.0, 1.0)
        }
    }
}

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]`, clamped at
/// both ends.
fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (out_min + (out_max - out_min) * (x - in_min) / (in_max - in_min)).clamp(out_min, out_max)
}

/// Amplitude ratio to decibels; zero maps to the finite [`DB_FLOOR`].
fn to_db(x: f32) -> f32 {
    let x = libm::fabsf(x);
    if x > 0.0 {
        20.0 * libm::log10f(x)
    } else {
        DB_FLOOR
    }
}
