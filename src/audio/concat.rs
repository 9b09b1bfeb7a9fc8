use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{PdaError, Result};

use super::extract::check_ffmpeg;

/// Concatenate same-format audio files, in order, into `output_path`.
///
/// A single input is copied as is; several go through FFmpeg's concat demuxer.
pub fn concatenate_audio_files(audio_files: &[PathBuf], output_path: &Path) -> Result<()> {
    match audio_files {
        [] => Err(PdaError::AudioProcessing(
            "No audio files provided".to_string(),
        )),
        [single] => {
            std::fs::copy(single, output_path)?;
            Ok(())
        }
        _ => concat_with_ffmpeg(audio_files, output_path),
    }
}

fn concat_with_ffmpeg(audio_files: &[PathBuf], output_path: &Path) -> Result<()> {
    check_ffmpeg()?;

    let list_dir = TempDir::new()?;
    let list_file = list_dir.path().join("concat_list.txt");
    std::fs::write(&list_file, concat_list(audio_files)?)?;

    debug!(
        "Concatenating {} files into {}",
        audio_files.len(),
        output_path.display()
    );

    let output = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_file)
        .args(["-c", "copy"])
        .arg(output_path)
        .output()
        .map_err(|e| PdaError::AudioProcessing(format!("Failed to run FFmpeg concat: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PdaError::AudioProcessing(format!(
            "FFmpeg concat failed: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

/// Concat demuxer input list. Paths are made absolute since the demuxer
/// resolves relative entries against the list file's directory.
fn concat_list(audio_files: &[PathBuf]) -> Result<String> {
    let mut list = String::new();
    for path in audio_files {
        let absolute = std::path::absolute(path)?;
        let escaped = absolute.to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    Ok(list)
}
