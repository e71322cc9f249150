use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::auth::PasswordScheme;
use crate::language::Language;

const APP_DIR: &str = "voice-translator";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite credential database. Empty means `<data_dir>/voice-translator/auth.db`.
    pub database_path: String,
    /// Digest applied to passwords of newly created accounts.
    pub password_scheme: PasswordScheme,
    /// Voice recording length in seconds (1..=10).
    pub record_seconds: u32,
    pub default_target: Language,
    /// Multilingual whisper model file name.
    pub whisper_model: String,
    pub translate_url: String,
    pub tts_url: String,
    pub thesaurus_url: String,
    /// Where synthesized speech is written. Empty means the data directory.
    pub output_dir: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            password_scheme: PasswordScheme::default(),
            record_seconds: 5,
            default_target: Language::En,
            whisper_model: "ggml-base.bin".into(),
            translate_url: "https://translate.googleapis.com/translate_a/single".into(),
            tts_url: "https://translate.google.com/translate_tts".into(),
            thesaurus_url: "https://api.datamuse.com/words".into(),
            output_dir: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Directory: ~/.config/voice-translator/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push(APP_DIR);
        p
    }

    fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Directory: ~/.local/share/voice-translator/
    pub fn data_dir() -> PathBuf {
        let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push(APP_DIR);
        p
    }

    /// Load from disk, returning defaults if file doesn't exist or is invalid.
    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn exists() -> bool {
        Self::path().exists()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let dir = Self::dir();
        fs::create_dir_all(&dir)?;
        let data = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(), data)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        if self.database_path.is_empty() {
            Self::data_dir().join("auth.db")
        } else {
            PathBuf::from(&self.database_path)
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        if self.output_dir.is_empty() {
            Self::data_dir()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }

    /// Recording length clamped to the range the recorder accepts.
    pub fn record_seconds(&self) -> u32 {
        self.record_seconds.clamp(1, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "record_seconds": 8, "default_target": "hi" }"#).unwrap();
        assert_eq!(cfg.record_seconds, 8);
        assert_eq!(cfg.default_target, Language::Hi);
        assert_eq!(cfg.whisper_model, "ggml-base.bin");
        assert_eq!(cfg.password_scheme, PasswordScheme::Sha256);
    }

    #[test]
    fn empty_paths_resolve_under_data_dir() {
        let cfg = Config::default();
        assert!(cfg.database_path().ends_with("voice-translator/auth.db"));
        assert!(cfg.output_dir().ends_with("voice-translator"));
    }

    #[test]
    fn record_seconds_is_clamped() {
        let cfg = Config {
            record_seconds: 42,
            ..Config::default()
        };
        assert_eq!(cfg.record_seconds(), 10);
        let cfg = Config {
            record_seconds: 0,
            ..Config::default()
        };
        assert_eq!(cfg.record_seconds(), 1);
    }
}
