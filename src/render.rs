use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::degrade::chain::MAX_CHANNELS;
use crate::engine::Engine;
use crate::telemetry::TelemetrySnapshot;

/// Summary of a finished offline render.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub frames: usize,
    pub channels: usize,
    pub sample_rate: u32,
    pub telemetry: TelemetrySnapshot,
}

impl std::fmt::Display for RenderReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seconds = self.frames as f64 / f64::from(self.sample_rate);
        writeln!(
            f,
            "Rendered {} frames ({seconds:.2} s), {} channel(s) at {} Hz",
            self.frames, self.channels, self.sample_rate
        )?;
        write!(
            f,
            "Mode: {}, input peak {:.3}, degradation {:.2}",
            self.telemetry.mode, self.telemetry.input_peak, self.telemetry.degradation
        )
    }
}

/// `<stem>_lofi_<timestamp>.wav` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("render");
    let filename = format!(
        "{stem}_lofi_{}.wav",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    input.with_file_name(filename)
}

/// Read every sample of a WAV file as `f32` in [-1, 1], de-interleaved.
pub fn read_wav(path: &Path) -> Result<(WavSpec, Vec<Vec<f32>>)> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("WAV file {} has no channels", path.display());
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read float samples")?,
        SampleFormat::Int => {
            let max_val = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read integer samples")?
        }
    };

    let channels = usize::from(spec.channels);
    let mut planar = vec![Vec::with_capacity(interleaved.len() / channels); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((spec, planar))
}

/// Write planar channels as an interleaved WAV file in `spec`'s format.
/// Integer formats are clamped to full scale.
pub fn write_wav(path: &Path, spec: WavSpec, channels: &[Vec<f32>]) -> Result<()> {
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    let frames = channels.first().map_or(0, Vec::len);

    match spec.sample_format {
        SampleFormat::Float => {
            for i in 0..frames {
                for channel in channels {
                    writer.write_sample(channel[i])?;
                }
            }
        }
        SampleFormat::Int => {
            let max_val = int_scale(spec.bits_per_sample);
            for i in 0..frames {
                for channel in channels {
                    let value = (channel[i].clamp(-1.0, 1.0) * max_val)
                        .round()
                        .clamp(-max_val, max_val - 1.0);
                    writer.write_sample(value as i32)?;
                }
            }
        }
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file {}", path.display()))
}

fn int_scale(bits_per_sample: u16) -> f32 {
    (1u64 << (bits_per_sample - 1)) as f32
}

/// Run a whole file through `engine` in blocks of `block_size` frames.
pub fn render_file(
    engine: &mut Engine,
    input: &Path,
    output: &Path,
    block_size: usize,
) -> Result<RenderReport> {
    let (spec, mut channels) = read_wav(input)?;
    let frames = channels.first().map_or(0, Vec::len);
    info!(
        "Rendering {} ({} channel(s), {} Hz, {} frames)",
        input.display(),
        spec.channels,
        spec.sample_rate,
        frames
    );
    if channels.len() > MAX_CHANNELS {
        warn!(
            "{} has {} channels; channels beyond the first {MAX_CHANNELS} pass through unprocessed",
            input.display(),
            channels.len()
        );
    }

    engine
        .prepare(spec.sample_rate as f32, block_size)
        .context("Failed to prepare engine")?;

    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        engine
            .process(&mut block)
            .with_context(|| format!("Failed to process frames {start}..{end}"))?;
        start = end;
    }
    debug!("Processed {frames} frames in blocks of {block_size}");

    engine.release();
    write_wav(output, spec, &channels)?;
    info!("Render saved: {}", output.display());

    Ok(RenderReport {
        frames,
        channels: channels.len(),
        sample_rate: spec.sample_rate,
        telemetry: engine.handle().telemetry(),
    })
}
