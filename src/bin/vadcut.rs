//! Command-line speech extractor.
//!
//! Reads one or more WAV recordings, runs the voice-activity pipeline over
//! each, and writes the speech-only audio next to the input (or into the
//! directory given with `--output`) as `<stem>_vad.wav`.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use vadcut::error::VadcutError;
use vadcut::pipeline::{SpeechExtractor, VadConfig};
use vadcut::wav;

struct Args {
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut inputs = Vec::new();
    let mut output_dir = None;
    let mut config = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                let v = iter.next().ok_or("--output requires a directory")?;
                output_dir = Some(PathBuf::from(v));
            }
            "--config" | "-c" => {
                let v = iter.next().ok_or("--config requires a file")?;
                config = Some(PathBuf::from(v));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: vadcut [--output <dir>] [--config <file.json>] <input.wav>..."
                );
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown argument: {other}"));
            }
            other => inputs.push(PathBuf::from(other)),
        }
    }

    if inputs.is_empty() {
        return Err("at least one input WAV file is required (see --help)".into());
    }
    Ok(Args {
        inputs,
        output_dir,
        config,
    })
}

fn load_config(path: Option<&Path>) -> Result<VadConfig, VadcutError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text).map_err(|e| {
                VadcutError::InvalidConfiguration(format!("{}: {e}", path.display()))
            })
        }
        None => Ok(VadConfig::default()),
    }
}

fn process(
    extractor: &SpeechExtractor,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<(), VadcutError> {
    let waveform = wav::read_mono(input)?;
    let extraction = extractor.run(&waveform)?;
    info!(
        input = %input.display(),
        segments = extraction.segments.len(),
        speech_secs = extraction.speech.duration_secs(),
        "extraction complete"
    );

    // A bad output directory should not abort the rest of the batch.
    let output = match wav::speech_output_path(input, output_dir) {
        Ok(output) => output,
        Err(e) => {
            warn!(input = %input.display(), "skipping write: {e}");
            return Ok(());
        }
    };
    wav::write_mono(&output, &extraction.speech)?;
    info!(output = %output.display(), "speech audio written");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vadcut=info".parse().unwrap()),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("vadcut: {e}");
            std::process::exit(2);
        }
    };

    let extractor = match load_config(args.config.as_deref())
        .and_then(SpeechExtractor::new)
    {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("vadcut: {e}");
            std::process::exit(2);
        }
    };

    let mut failures = 0usize;
    for input in &args.inputs {
        if let Err(e) = process(&extractor, input, args.output_dir.as_deref()) {
            error!(input = %input.display(), "processing failed: {e}");
            failures += 1;
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}
