pub mod chunk;
pub mod concat;
pub mod extract;

pub use chunk::{create_chunks, plan_fixed_chunks, TRANSCRIPTION_CHUNK};
pub use concat::concatenate_audio_files;
pub use extract::{
    check_ffmpeg, check_ffprobe, extract_audio, extract_audio_segment, get_audio_duration,
};

use std::path::PathBuf;
use std::time::Duration;

/// A time span within a media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRegion {
    pub start: Duration,
    pub end: Duration,
}

impl TimeRegion {
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

fn format_timestamp(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

impl std::fmt::Display for TimeRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_timestamp(self.start),
            format_timestamp(self.end)
        )
    }
}

/// A chunk of audio ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub region: TimeRegion,
    pub path: PathBuf,
    pub index: usize,
}
