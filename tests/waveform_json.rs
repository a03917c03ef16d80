//! Integration test: synthetic WAV bytes → decode → reduce → JSON document.

use wt_dsp::{reduce_waveform, AmplitudeScale, ChannelSelector, ReduceParams, Reduction, Waveform};
use wt_formats::{document_to_string, load_wav, DecodedSamples, Document};

/// Build a minimal PCM WAV file from interleaved 16-bit samples.
fn make_wav_16(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let pcm: Vec<u8> = samples.iter().flat_map(|&v| v.to_le_bytes()).collect();
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;
    let data_size = pcm.len() as u32;

    let mut buf = Vec::new();
    buf.extend(b"RIFF");
    buf.extend(&(36 + data_size).to_le_bytes());
    buf.extend(b"WAVE");
    buf.extend(b"fmt ");
    buf.extend(&16u32.to_le_bytes());
    buf.extend(&1u16.to_le_bytes());
    buf.extend(&channels.to_le_bytes());
    buf.extend(&sample_rate.to_le_bytes());
    buf.extend(&byte_rate.to_le_bytes());
    buf.extend(&block_align.to_le_bytes());
    buf.extend(&16u16.to_le_bytes());
    buf.extend(b"data");
    buf.extend(&data_size.to_le_bytes());
    buf.extend(pcm);
    buf
}

fn reduce(wav: &[u8], params: &ReduceParams) -> (Waveform, u64) {
    let decoded = load_wav(wav).unwrap();
    let duration = decoded.duration_secs();
    let DecodedSamples::Int16(mut source) = decoded.samples else {
        panic!("expected Int16 samples from PCM input");
    };
    match reduce_waveform(&mut source, params, |_| true).unwrap() {
        Reduction::Complete(waveform) => (waveform, duration),
        Reduction::Cancelled => panic!("unexpected cancellation"),
    }
}

#[test]
fn stereo_wav_reduces_to_requested_points() {
    // 1000 alternating-polarity frames, louder on the right
    let mut samples = Vec::new();
    for i in 0..1000 {
        let sign = if i % 2 == 0 { 1 } else { -1 };
        samples.push(sign * 8192);
        samples.push(sign * 16384);
    }
    let wav = make_wav_16(2, 1000, &samples);

    let (waveform, duration) = reduce(
        &wav,
        &ReduceParams {
            points: 100,
            selectors: vec![ChannelSelector::Left, ChannelSelector::Right],
            scale: AmplitudeScale::Linear,
        },
    );

    assert_eq!(duration, 1);
    assert_eq!(waveform.channels.len(), 2);
    for channel in &waveform.channels {
        assert_eq!(channel.values.len(), 100);
    }
    // 8192/32768 and 16384/32768
    for value in &waveform.channels[0].values {
        assert!((value - 0.25).abs() < 1e-6);
    }
    for value in &waveform.channels[1].values {
        assert!((value - 0.5).abs() < 1e-6);
    }
}

#[test]
fn mono_wav_drops_stereo_channels_and_documents_the_rest() {
    let wav = make_wav_16(1, 100, &[0i16; 250]);
    let (waveform, duration) = reduce(
        &wav,
        &ReduceParams {
            points: 10,
            selectors: vec![
                ChannelSelector::Left,
                ChannelSelector::Right,
                ChannelSelector::Mid,
            ],
            scale: AmplitudeScale::Linear,
        },
    );

    assert_eq!(duration, 2);
    assert_eq!(
        waveform.dropped,
        vec![ChannelSelector::Right, ChannelSelector::Mid]
    );

    let doc = Document {
        generator: Some("wavetrace test"),
        duration_secs: duration,
        waveform: &waveform,
        precision: 2,
    };
    let text = document_to_string(&doc);
    assert!(text.contains("\"_generator\":\"wavetrace test\""));
    assert!(text.contains("\"duration\":2"));
    assert!(text.contains("\"left\":[0.00,0.00,0.00,0.00,0.00,0.00,0.00,0.00,0.00,0.00]"));
    assert!(!text.contains("\"right\""));
    assert!(!text.contains("\"mid\""));
}

#[test]
fn db_scale_document_hits_both_endpoints() {
    // First half silence, second half full scale
    let mut samples = vec![0i16; 100];
    samples.extend(std::iter::repeat(i16::MAX).take(100));
    let wav = make_wav_16(1, 200, &samples);

    let (waveform, _) = reduce(
        &wav,
        &ReduceParams {
            points: 2,
            selectors: vec![ChannelSelector::Left],
            scale: AmplitudeScale::Decibel {
                db_min: -48.0,
                db_max: 0.0,
            },
        },
    );

    let values = &waveform.channels[0].values;
    assert_eq!(values[0], 0.0, "silence clamps to the bottom of the window");
    // 32767/32768 is a fraction of a millibel below 0 dB
    assert!(values[1] > 0.999, "near-full scale maps near 1.0, got {}", values[1]);
}

#[test]
fn document_is_valid_json() {
    let wav = make_wav_16(2, 44100, &[100i16; 882]);
    let (waveform, duration) = reduce(
        &wav,
        &ReduceParams {
            points: 5,
            selectors: vec![ChannelSelector::Mid, ChannelSelector::Side],
            scale: AmplitudeScale::Linear,
        },
    );

    let doc = Document {
        generator: Some("wavetrace version 0.1.0"),
        duration_secs: duration,
        waveform: &waveform,
        precision: 6,
    };
    let text = document_to_string(&doc);

    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["_generator"], "wavetrace version 0.1.0");
    assert_eq!(parsed["duration"], 0);
    assert_eq!(parsed["mid"].as_array().unwrap().len(), 5);
    assert_eq!(parsed["side"].as_array().unwrap().len(), 5);
}
