//! wavetrace CLI — WAV in, waveform JSON out.
//!
//! Usage:
//!   wavetrace input.wav
//!   wavetrace input.wav -o waveform.json --channels left,mid --db-scale

mod options;

use std::fs;
use std::io::{self, Write};
use std::process;

use options::Options;
use wt_dsp::{reduce_waveform, AmplitudeScale, ReduceParams, Reduction};
use wt_formats::{load_wav, write_document, DecodedSamples, Document};

fn main() {
    let options = Options::from_env();

    let data = fs::read(&options.input).unwrap_or_else(|e| {
        eprintln!("Error opening audio file '{}': {}", options.input, e);
        process::exit(2);
    });

    let decoded = load_wav(&data).unwrap_or_else(|e| {
        eprintln!("Error decoding '{}': {}", options.input, e);
        process::exit(2);
    });

    let duration_secs = decoded.duration_secs();

    let params = ReduceParams {
        points: options.samples,
        selectors: options.channels.clone(),
        scale: if options.use_db_scale {
            AmplitudeScale::Decibel {
                db_min: options.db_min,
                db_max: options.db_max,
            }
        } else {
            AmplitudeScale::Linear
        },
    };

    let progress = |percent: usize| {
        eprint!("\rconverting: {:3}%", percent);
        let _ = io::stderr().flush();
        true
    };

    // The decoder picked the sample representation; stay monomorphic from
    // here on.
    let result = match decoded.samples {
        DecodedSamples::Int16(mut source) => reduce_waveform(&mut source, &params, progress),
        DecodedSamples::Float32(mut source) => reduce_waveform(&mut source, &params, progress),
    };
    eprintln!();

    let waveform = match result {
        Ok(Reduction::Complete(waveform)) => waveform,
        Ok(Reduction::Cancelled) => {
            eprintln!("conversion aborted");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    for selector in &waveform.dropped {
        eprintln!(
            "Warning: channel '{}' requires stereo input, removing requested channel.",
            selector
        );
    }
    if waveform.channels.is_empty() {
        eprintln!("Warning: there are no channels left to process.");
    }

    let generator = format!("wavetrace version {}", env!("CARGO_PKG_VERSION"));
    let doc = Document {
        generator: (!options.no_header).then_some(generator.as_str()),
        duration_secs,
        waveform: &waveform,
        precision: options.precision,
    };

    write_output(&options.output, &doc).unwrap_or_else(|e| {
        eprintln!("Error writing '{}': {}", options.output, e);
        process::exit(2);
    });
}

fn write_output(path: &str, doc: &Document) -> io::Result<()> {
    if path == "-" {
        let stdout = io::stdout();
        write_document(&mut stdout.lock(), doc)
    } else {
        let mut file = fs::File::create(path)?;
        write_document(&mut file, doc)
    }
}
