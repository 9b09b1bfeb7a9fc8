use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PdaError, Result};

use super::extract::extract_audio_segment;
use super::{AudioChunk, TimeRegion};

/// Chunk length for transcription uploads.
///
/// Ten minutes of 16kHz mono PCM is about 19 MB, under the 25 MB upload cap.
pub const TRANSCRIPTION_CHUNK: Duration = Duration::from_secs(600);

/// Cut `total_duration` into consecutive regions of at most `chunk_duration`.
pub fn plan_fixed_chunks(total_duration: Duration, chunk_duration: Duration) -> Vec<TimeRegion> {
    let mut chunks = Vec::new();
    if chunk_duration.is_zero() {
        return chunks;
    }

    let mut current = Duration::ZERO;
    while current < total_duration {
        let end = (current + chunk_duration).min(total_duration);
        chunks.push(TimeRegion {
            start: current,
            end,
        });
        current = end;
    }

    chunks
}

/// Create audio chunk files from planned regions.
pub async fn create_chunks(
    source_audio: &Path,
    regions: &[TimeRegion],
    output_dir: &Path,
) -> Result<Vec<AudioChunk>> {
    if !source_audio.exists() {
        return Err(PdaError::FileNotFound(source_audio.display().to_string()));
    }

    std::fs::create_dir_all(output_dir)?;

    info!(
        "Creating {} audio chunks in {}",
        regions.len(),
        output_dir.display()
    );

    let mut chunks = Vec::with_capacity(regions.len());

    for (index, region) in regions.iter().enumerate() {
        let chunk_path = output_dir.join(format!("chunk_{:04}.wav", index));

        debug!(
            "Creating chunk {}: {:?} to {:?}",
            index, region.start, region.end
        );

        extract_audio_segment(source_audio, &chunk_path, region.start, region.end).await?;

        chunks.push(AudioChunk {
            region: region.clone(),
            path: chunk_path,
            index,
        });
    }

    Ok(chunks)
}
