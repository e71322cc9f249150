use async_trait::async_trait;
use serde_json::Value;

use super::{check_status, Translator};
use crate::error::ServiceError;
use crate::language::Language;

/// Longest text the endpoint accepts in one request.
const MAX_CHARS: usize = 5000;

/// Google Translate web endpoint (`translate_a/single`, `client=gtx`).
pub struct GoogleTranslator {
    client: reqwest::Client,
    url: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("text is empty".into()));
        }
        let chars = text.chars().count();
        if chars > MAX_CHARS {
            return Err(ServiceError::InvalidInput(format!(
                "text is {chars} characters, the limit is {MAX_CHARS}"
            )));
        }

        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.tag()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;
        let body: Value = check_status(resp, "Translate").await?.json().await?;

        let translated = parse_segments(&body).ok_or_else(|| {
            ServiceError::ServiceUnavailable("unexpected translation response".into())
        })?;
        log::info!(
            "Translated {chars} chars into {} ({} chars)",
            target.tag(),
            translated.chars().count()
        );
        Ok(translated)
    }
}

/// The response is `[[["translated", "source", ...], ...], ...]`; the first
/// element of every inner array is one translated sentence.
fn parse_segments(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
