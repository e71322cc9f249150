use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of languages offered for input and translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Kn,
    Mr,
    Ta,
    Te,
    Bn,
    Gu,
    Ml,
    Pa,
}

impl Language {
    /// All languages in menu order.
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Hi,
        Language::Kn,
        Language::Mr,
        Language::Ta,
        Language::Te,
        Language::Bn,
        Language::Gu,
        Language::Ml,
        Language::Pa,
    ];

    /// Two-letter tag used by the translation and speech services.
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Kn => "kn",
            Language::Mr => "mr",
            Language::Ta => "ta",
            Language::Te => "te",
            Language::Bn => "bn",
            Language::Gu => "gu",
            Language::Ml => "ml",
            Language::Pa => "pa",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Kn => "Kannada",
            Language::Mr => "Marathi",
            Language::Ta => "Tamil",
            Language::Te => "Telugu",
            Language::Bn => "Bengali",
            Language::Gu => "Gujarati",
            Language::Ml => "Malayalam",
            Language::Pa => "Punjabi",
        }
    }

    /// Regional locale for speech recognition, e.g. "hi-IN".
    pub fn speech_locale(self) -> String {
        format!("{}-IN", self.tag())
    }

    /// Parse a tag ("kn") or a display name ("Kannada"), case-insensitively.
    pub fn parse(input: &str) -> Option<Language> {
        let needle = input.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.tag().eq_ignore_ascii_case(needle)
                || lang.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_and_names() {
        assert_eq!(Language::parse("kn"), Some(Language::Kn));
        assert_eq!(Language::parse("Malayalam"), Some(Language::Ml));
        assert_eq!(Language::parse(" PUNJABI "), Some(Language::Pa));
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn speech_locale_uses_india_region() {
        assert_eq!(Language::En.speech_locale(), "en-IN");
        assert_eq!(Language::Bn.speech_locale(), "bn-IN");
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Language::Gu).unwrap();
        assert_eq!(json, "\"gu\"");
        let back: Language = serde_json::from_str("\"ta\"").unwrap();
        assert_eq!(back, Language::Ta);
    }
}
