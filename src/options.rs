//! Command-line options with config-file merging.
//!
//! Command-line values win over config-file values, which win over the
//! built-in defaults. The config file is JSON with every key optional; a
//! missing default config file is silent, a missing explicitly named one
//! is fatal.

use std::fs;
use std::process;

use serde::Deserialize;
use wt_dsp::ChannelSelector;

const DEFAULT_SAMPLES: usize = 800;
const DEFAULT_DB_MIN: f32 = -48.0;
const DEFAULT_DB_MAX: f32 = 0.0;
const DEFAULT_PRECISION: usize = 6;
const DEFAULT_CONFIG_FILE: &str = "wavetrace.cfg";

/// Fully resolved options for one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub input: String,
    /// Output path; `-` selects stdout
    pub output: String,
    pub samples: usize,
    pub channels: Vec<ChannelSelector>,
    pub use_db_scale: bool,
    pub db_min: f32,
    pub db_max: f32,
    pub precision: usize,
    pub no_header: bool,
}

impl Options {
    /// Parse the process arguments, merge the config file, and validate.
    /// Prints usage and exits on `--help`, `--version`, or any error.
    pub fn from_env() -> Options {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let cli = parse_args(&args).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        });

        if cli.help {
            print_usage();
            process::exit(0);
        }
        if cli.version {
            println!("wavetrace {}", env!("CARGO_PKG_VERSION"));
            process::exit(0);
        }

        let config_path = cli
            .config_file
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_CONFIG_FILE));
        let config = match fs::read_to_string(&config_path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("Error: config file '{}': {}", config_path, e);
                process::exit(1);
            }),
            Err(_) if cli.config_file.is_none() => ConfigFile::default(),
            Err(e) => {
                eprintln!("Error: config file '{}': {}", config_path, e);
                process::exit(1);
            }
        };

        resolve(cli, config).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        })
    }
}

/// Raw command-line values before merging.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input: Option<String>,
    output: Option<String>,
    samples: Option<usize>,
    channels: Option<Vec<ChannelSelector>>,
    db_scale: bool,
    db_min: Option<f32>,
    db_max: Option<f32>,
    precision: Option<usize>,
    no_header: bool,
    config_file: Option<String>,
    help: bool,
    version: bool,
}

/// Config-file values; every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    output: Option<String>,
    samples: Option<usize>,
    channels: Option<Vec<String>>,
    db_scale: Option<bool>,
    db_min: Option<f32>,
    db_max: Option<f32>,
    precision: Option<usize>,
    no_header: Option<bool>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "-o" | "--output" => cli.output = Some(value_for(arg)?),
            "-s" | "--samples" => {
                cli.samples = Some(parse_number(&value_for(arg)?, "--samples")?)
            }
            "--channels" => cli.channels = Some(parse_channels(&value_for(arg)?)?),
            "-d" | "--db-scale" => cli.db_scale = true,
            "--db-min" => cli.db_min = Some(parse_number(&value_for(arg)?, "--db-min")?),
            "--db-max" => cli.db_max = Some(parse_number(&value_for(arg)?, "--db-max")?),
            "--precision" => {
                cli.precision = Some(parse_number(&value_for(arg)?, "--precision")?)
            }
            "--no-header" => cli.no_header = true,
            "-c" | "--config" => cli.config_file = Some(value_for(arg)?),
            "--help" => cli.help = true,
            "-v" | "--version" => cli.version = true,
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option '{}'", other));
            }
            _ if cli.input.is_none() => cli.input = Some(arg.clone()),
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
    }

    Ok(cli)
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value '{}' for {}", value, flag))
}

/// Selector lists are comma or space separated: `left,right` or `"left mid"`.
fn parse_channels(list: &str) -> Result<Vec<ChannelSelector>, String> {
    let mut selectors = Vec::new();
    for token in list.split([',', ' ']).filter(|t| !t.is_empty()) {
        selectors.push(token.parse().map_err(|e| format!("{}", e))?);
    }
    Ok(selectors)
}

fn resolve(cli: CliArgs, config: ConfigFile) -> Result<Options, String> {
    let input = cli.input.ok_or("no input file supplied")?;

    let config_channels = match config.channels {
        Some(names) => Some(parse_channels(&names.join(","))?),
        None => None,
    };

    let samples = cli.samples.or(config.samples).unwrap_or(DEFAULT_SAMPLES);
    if samples == 0 {
        return Err(String::from("samples cannot be 0"));
    }

    let db_min = cli.db_min.or(config.db_min).unwrap_or(DEFAULT_DB_MIN);
    let db_max = cli.db_max.or(config.db_max).unwrap_or(DEFAULT_DB_MAX);
    if db_min >= db_max {
        return Err(format!("db-min ({}) must be below db-max ({})", db_min, db_max));
    }

    let output = cli
        .output
        .or(config.output)
        .unwrap_or_else(|| format!("{}.json", input));

    Ok(Options {
        output,
        samples,
        channels: cli.channels.or(config_channels).unwrap_or_else(|| {
            vec![ChannelSelector::Left, ChannelSelector::Right]
        }),
        use_db_scale: cli.db_scale || config.db_scale.unwrap_or(false),
        db_min,
        db_max,
        precision: cli.precision.or(config.precision).unwrap_or(DEFAULT_PRECISION),
        no_header: cli.no_header || config.no_header.unwrap_or(false),
        input,
    })
}

fn print_usage() {
    println!("wavetrace {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("usage: wavetrace [options] input_file_name");
    println!("example: wavetrace my_file.wav");
    println!();
    println!("options:");
    println!("  -s, --samples N     number of output points per channel (default 800)");
    println!("      --channels LIST channels to compute: left, right, mid, side, min, max");
    println!("                      (default left,right)");
    println!("  -o, --output FILE   output file, '-' for stdout (default <input>.json)");
    println!("  -c, --config FILE   JSON config file (default {})", DEFAULT_CONFIG_FILE);
    println!("  -d, --db-scale      use a logarithmic (decibel) scale instead of linear");
    println!("      --db-min F      lowest visible signal level in dB (default -48)");
    println!("      --db-max F      highest visible signal level in dB (default 0)");
    println!("      --precision N   decimal places per value (default 6)");
    println!("      --no-header     omit the _generator key from the document");
    println!("  -v, --version       print version and exit");
    println!("      --help          print this message and exit");
}
