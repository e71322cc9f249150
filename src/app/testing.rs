//! In-process fakes for the service adapters.

use async_trait::async_trait;
use tempfile::TempDir;

use super::state::{AppState, Services};
use crate::config::Config;
use crate::error::ServiceError;
use crate::language::Language;
use crate::services::{SpeechToText, TextToSpeech, Thesaurus, Translator, WordRelations};

struct FakeStt;

#[async_trait]
impl SpeechToText for FakeStt {
    async fn transcribe(&self, wav: Vec<u8>, language: Language) -> Result<String, ServiceError> {
        if wav.is_empty() {
            Err(ServiceError::NoSpeechDetected)
        } else {
            Ok(format!("heard {} bytes in {}", wav.len(), language.speech_locale()))
        }
    }
}

struct FakeTranslator;

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        Ok(format!("[{}] {text}", target.tag()))
    }
}

struct FakeTts {
    fail: bool,
}

#[async_trait]
impl TextToSpeech for FakeTts {
    async fn synthesize(&self, text: &str, _language: Language) -> Result<Vec<u8>, ServiceError> {
        if self.fail {
            Err(ServiceError::ServiceUnavailable("tts down".into()))
        } else {
            Ok(text.as_bytes().to_vec())
        }
    }
}

struct FakeThesaurus;

#[async_trait]
impl Thesaurus for FakeThesaurus {
    async fn lookup(&self, word: &str, language: Language) -> WordRelations {
        if language != Language::En {
            return WordRelations::default();
        }
        WordRelations {
            synonyms: vec![format!("{word}-syn")],
            antonyms: vec![format!("{word}-ant")],
        }
    }
}

pub fn test_state(tts_fails: bool) -> (TempDir, AppState) {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        database_path: tmp.path().join("auth.db").to_string_lossy().into_owned(),
        output_dir: tmp.path().join("out").to_string_lossy().into_owned(),
        ..Config::default()
    };
    let services = Services {
        stt: Box::new(FakeStt),
        translator: Box::new(FakeTranslator),
        tts: Box::new(FakeTts { fail: tts_fails }),
        thesaurus: Box::new(FakeThesaurus),
    };
    let state = AppState::new(config, services).unwrap();
    (tmp, state)
}
