use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PdaError, Result};

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| {
            PdaError::AudioProcessing(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(PdaError::AudioProcessing(
            "FFmpeg check failed".to_string(),
        ));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe")
        .arg("-version")
        .output()
        .map_err(|e| {
            PdaError::AudioProcessing(format!(
                "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(PdaError::AudioProcessing(
            "FFprobe check failed".to_string(),
        ));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get media duration using FFprobe.
pub fn get_audio_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| PdaError::AudioProcessing(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdaError::AudioProcessing(format!(
            "FFprobe failed: {stderr}"
        )));
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|e| {
        PdaError::AudioProcessing(format!("Failed to parse duration '{}': {e}", raw.trim()))
    })?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(PdaError::AudioProcessing(format!(
            "Invalid duration: {secs}"
        )));
    }

    Ok(Duration::from_secs_f64(secs))
}

/// Extract the audio track of a video/audio file as WAV.
///
/// The output is mono 16-bit PCM at 16kHz, which is what speech recognition expects.
pub async fn extract_audio(input: &Path, output: &Path) -> Result<Duration> {
    check_ffmpeg()?;
    check_ffprobe()?;

    if !input.exists() {
        return Err(PdaError::FileNotFound(input.display().to_string()));
    }

    info!("Extracting audio from {}", input.display());

    let duration = get_audio_duration(input)?;
    debug!("Input duration: {:?}", duration);

    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
        .arg(output)
        .status()
        .map_err(|e| PdaError::AudioProcessing(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(PdaError::AudioProcessing(
            "FFmpeg audio extraction failed".to_string(),
        ));
    }

    if !output.exists() {
        return Err(PdaError::AudioProcessing(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio extracted to {}", output.display());
    Ok(duration)
}

/// Extract a segment of audio between start and end times.
pub async fn extract_audio_segment(
    input: &Path,
    output: &Path,
    start: Duration,
    end: Duration,
) -> Result<()> {
    if !input.exists() {
        return Err(PdaError::FileNotFound(input.display().to_string()));
    }

    let duration = end.saturating_sub(start);
    if duration.is_zero() {
        return Err(PdaError::AudioProcessing(
            "Segment duration is zero".to_string(),
        ));
    }

    let start_secs = format!("{:.3}", start.as_secs_f64());
    let duration_secs = format!("{:.3}", duration.as_secs_f64());

    debug!(
        "Extracting segment: start={}, duration={}",
        start_secs, duration_secs
    );

    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-ss"])
        .arg(&start_secs)
        .arg("-t")
        .arg(&duration_secs)
        .arg("-i")
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
        .arg(output)
        .status()
        .map_err(|e| PdaError::AudioProcessing(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(PdaError::AudioProcessing(
            "FFmpeg segment extraction failed".to_string(),
        ));
    }

    Ok(())
}
