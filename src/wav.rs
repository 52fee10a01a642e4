//! WAV file boundary: decode input recordings, write extracted speech.

use std::path::{Path, PathBuf};

use crate::error::{Result, VadcutError};
use crate::signal::Waveform;

fn wav_error(path: &Path, e: hound::Error) -> VadcutError {
    VadcutError::AudioFile(format!("{}: {e}", path.display()))
}

/// Decode a WAV file to a mono f32 waveform.
///
/// Integer formats are normalized to [-1.0, 1.0]; multi-channel audio is
/// mixed down by averaging the channels.
pub fn read_mono(path: &Path) -> Result<Waveform> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| wav_error(path, e))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map_err(|e| wav_error(path, e)))
            .collect::<Result<Vec<_>>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample <= 16 {
                reader
                    .samples::<i16>()
                    .map(|s| {
                        s.map(|v| (v as f32) / (i16::MAX as f32))
                            .map_err(|e| wav_error(path, e))
                    })
                    .collect::<Result<Vec<_>>>()?
            } else {
                let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| (v as f32) / max).map_err(|e| wav_error(path, e)))
                    .collect::<Result<Vec<_>>>()?
            }
        }
    };

    if channels == 1 {
        return Ok(Waveform::new(interleaved, spec.sample_rate));
    }

    let mut mono = Vec::with_capacity(interleaved.len() / channels);
    for frame in interleaved.chunks(channels) {
        let sum = frame.iter().copied().sum::<f32>();
        mono.push(sum / channels as f32);
    }
    Ok(Waveform::new(mono, spec.sample_rate))
}

/// Write a mono f32 waveform as a 32-bit float WAV file.
pub fn write_mono(path: &Path, waveform: &Waveform) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| wav_error(path, e))?;
    for &sample in &waveform.samples {
        writer
            .write_sample(sample)
            .map_err(|e| wav_error(path, e))?;
    }
    writer
        .finalize()
        .map_err(|e| wav_error(path, e))?;
    Ok(())
}

/// Output path for the extracted speech of `input`: `<stem>_vad.wav`,
/// placed in `output_dir` when given, else next to the input.
///
/// # Errors
/// Returns [`VadcutError::OutputPath`] when `output_dir` is given but does
/// not exist or is not a directory, so a caller processing a batch can
/// report the path and move on.
pub fn speech_output_path(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("speech");
    let file_name = format!("{stem}_vad.wav");

    match output_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(VadcutError::OutputPath {
                    path: dir.to_path_buf(),
                });
            }
            Ok(dir.join(file_name))
        }
        None => Ok(input.with_file_name(file_name)),
    }
}
