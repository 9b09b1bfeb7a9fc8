pub mod whisper;

pub use whisper::WhisperClient;

use crate::audio::AudioChunk;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;

/// Text recognized in one audio chunk.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    /// Language the service detected, when it reports one.
    pub language: Option<String>,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<Transcript>;
    fn name(&self) -> &'static str;
    /// Largest chunk file the service accepts, in bytes.
    fn max_file_size(&self) -> u64;
}

/// Build the transcriber from configured credentials and model.
pub fn create_transcriber(config: &Config, language: Option<&str>) -> Result<Box<dyn Transcriber>> {
    Ok(Box::new(WhisperClient::from_config(config, language)?))
}
