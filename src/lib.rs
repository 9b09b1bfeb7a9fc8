pub mod actions;
pub mod audio;
pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod interactive;
pub mod ocr;
pub mod server;
pub mod storage;
pub mod text;
pub mod transcribe;
pub mod translate;
pub mod tts;

pub use config::Config;
pub use error::{PdaError, Result};
