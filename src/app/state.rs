use std::path::PathBuf;

use crate::auth::{AuthPage, CredentialStore, Session, SignupForm};
use crate::config::Config;
use crate::error::AppError;
use crate::language::Language;
use crate::services::{
    self, Datamuse, GoogleTranslator, GoogleTts, SpeechToText, TextToSpeech, Thesaurus,
    Translator, WhisperTranscriber, WordRelations,
};
use crate::text_tools::Sentiment;

/// A user interaction, as submitted by the front-end.
#[derive(Debug, Clone)]
pub enum Action {
    Navigate(AuthPage),
    Login { username: String, password: String },
    Signup(SignupForm),
    RequestReset { email: String },
    Logout,
    /// Record from the microphone, then transcribe.
    Record { language: Language },
    /// Transcribe already-captured WAV audio.
    Transcribe { wav: Vec<u8>, language: Language },
    SetText(String),
    LoadFile { name: String, bytes: Vec<u8> },
    Translate { target: Language },
    Process { tool: TextTool, text: String },
    AnalyzeWord { word: String, language: Language },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTool {
    Summarize,
    Keywords,
    Sentiment,
}

/// What a successful action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    PageChanged(AuthPage),
    LoggedIn(String),
    AccountCreated(String),
    ResetRequested(&'static str),
    LoggedOut,
    /// New working text, from speech, typing, or a file.
    TextReady(String),
    Translated(Translation),
    Processed(Processed),
    WordAnalysis(WordRelations),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub target: Language,
    /// Where the synthesized speech was written, if synthesis worked.
    pub audio_path: Option<PathBuf>,
    /// Why speech is missing, if it is.
    pub speech_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    Summary(String),
    Keywords(Vec<String>),
    Sentiment(Sentiment),
}

/// The external service adapters used by one app instance.
pub struct Services {
    pub stt: Box<dyn SpeechToText>,
    pub translator: Box<dyn Translator>,
    pub tts: Box<dyn TextToSpeech>,
    pub thesaurus: Box<dyn Thesaurus>,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        let client = services::http_client(config.request_timeout_secs);
        Self {
            stt: Box::new(WhisperTranscriber::new(
                Config::data_dir().join("models"),
                config.whisper_model.clone(),
            )),
            translator: Box::new(GoogleTranslator::new(
                client.clone(),
                config.translate_url.clone(),
            )),
            tts: Box::new(GoogleTts::new(client.clone(), config.tts_url.clone())),
            thesaurus: Box::new(Datamuse::new(client, config.thesaurus_url.clone())),
        }
    }
}

/// Everything one interactive session needs. Passed explicitly to every
/// handler; dropped when the session ends.
pub struct AppState {
    pub config: Config,
    pub store: CredentialStore,
    pub session: Session,
    pub services: Services,
    pub tokio_rt: tokio::runtime::Runtime,
    /// Text the Translate action works on.
    pub original_text: Option<String>,
}

impl AppState {
    pub fn new(config: Config, services: Services) -> Result<Self, AppError> {
        let store = CredentialStore::open(&config.database_path(), config.password_scheme)?;
        let tokio_rt = tokio::runtime::Runtime::new().map_err(AppError::Runtime)?;

        Ok(Self {
            config,
            store,
            session: Session::new(),
            services,
            tokio_rt,
            original_text: None,
        })
    }
}
