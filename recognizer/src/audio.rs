//! Source audio conversion and per-annotation clip extraction.
//!
//! The source recording is first converted with ffmpeg into the 16 kHz mono
//! 16-bit WAV format Persephone expects, then sliced into one clip per
//! annotation span.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Sample rate Persephone expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Locate the ffmpeg executable, honoring a configured override.
pub fn find_ffmpeg(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        bail!("Configured ffmpeg path does not exist: {}", path.display());
    }
    which("ffmpeg").context("ffmpeg not found on PATH")
}

/// Minimal PATH search for an executable.
fn which(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Convert `source` into a 16 kHz mono s16 PCM WAV at `output`.
pub async fn convert_source(ffmpeg: &Path, source: &Path, output: &Path) -> Result<()> {
    info!(source = %source.display(), "Converting source audio");

    let status = Command::new(ffmpeg)
        .arg("-y")
        .arg("-v")
        .arg("0")
        .arg("-i")
        .arg(source)
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg(TARGET_SAMPLE_RATE.to_string())
        .arg("-sample_fmt")
        .arg("s16")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg(output)
        .status()
        .await
        .context("Failed to run ffmpeg")?;

    if !status.success() {
        bail!(
            "ffmpeg exited with {status} while converting {}",
            source.display()
        );
    }
    Ok(())
}

/// The converted source recording, loaded for clip extraction.
pub struct ClipSource {
    samples: Vec<i16>,
    spec: hound::WavSpec,
}

impl ClipSource {
    /// Load a converted WAV into memory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open converted audio: {}", path.display()))?;
        let spec = reader.spec();
        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;
        debug!(
            samples = samples.len(),
            sample_rate = spec.sample_rate,
            "Loaded converted audio"
        );
        Ok(Self { samples, spec })
    }

    /// Write the `[start_ms, end_ms)` slice of the recording as a WAV clip.
    ///
    /// Spans beyond the end of the recording are clamped; an empty span
    /// produces a header-only clip.
    pub fn write_clip(&self, start_ms: u64, end_ms: u64, path: &Path) -> Result<()> {
        let start = self.sample_index(start_ms);
        let end = self.sample_index(end_ms).max(start);

        let mut writer = hound::WavWriter::create(path, self.spec)
            .with_context(|| format!("Failed to create clip: {}", path.display()))?;
        for &sample in &self.samples[start..end] {
            writer.write_sample(sample)?;
        }
        writer.finalize().context("Failed to finalize clip")?;
        Ok(())
    }

    fn sample_index(&self, ms: u64) -> usize {
        let index = ms as u128 * self.spec.sample_rate as u128 / 1000;
        (index as usize).min(self.samples.len())
    }
}

#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;
