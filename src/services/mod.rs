//! Single-attempt adapters over the external speech, translation and
//! dictionary services. None of them retry or cache.

mod speech;
mod thesaurus;
mod transcriber;
mod translator;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ServiceError;
use crate::language::Language;

pub use speech::GoogleTts;
pub use thesaurus::Datamuse;
pub use transcriber::WhisperTranscriber;
pub use translator::GoogleTranslator;

/// Synonyms and antonyms for one word. Both lists are empty when nothing is
/// known or the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordRelations {
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

impl WordRelations {
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty() && self.antonyms.is_empty()
    }
}

/// Turns recorded WAV audio into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, wav: Vec<u8>, language: Language) -> Result<String, ServiceError>;
}

/// Translates text into `target`, detecting the source language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError>;
}

/// Synthesizes MP3 speech.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, ServiceError>;
}

/// Best-effort word relation lookup. Failures degrade to an empty result.
#[async_trait]
pub trait Thesaurus: Send + Sync {
    async fn lookup(&self, word: &str, language: Language) -> WordRelations;
}

/// HTTP client shared by the network adapters.
pub fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("voice-translator/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Falling back to default HTTP client: {e}");
            reqwest::Client::new()
        })
}

/// Turn a non-success response into `ServiceUnavailable`, keeping the body.
async fn check_status(resp: reqwest::Response, service: &str) -> Result<reqwest::Response, ServiceError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(ServiceError::ServiceUnavailable(format!(
        "{service} error {status}: {text}"
    )))
}
