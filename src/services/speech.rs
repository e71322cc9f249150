use async_trait::async_trait;

use super::{check_status, TextToSpeech};
use crate::error::ServiceError;
use crate::language::Language;

/// The endpoint rejects requests longer than this many characters.
const MAX_CHUNK_CHARS: usize = 100;

/// Google Translate speech endpoint (`translate_tts`, `client=tw-ob`).
/// Long text is sent in chunks and the MP3 frames are concatenated.
pub struct GoogleTts {
    client: reqwest::Client,
    url: String,
}

impl GoogleTts {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TextToSpeech for GoogleTts {
    async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>, ServiceError> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ServiceError::ServiceUnavailable("nothing to speak".into()));
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let resp = self
                .client
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language.tag()),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await?;
            let bytes = check_status(resp, "Text-to-speech").await?.bytes().await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(ServiceError::ServiceUnavailable(
                "text-to-speech returned no audio".into(),
            ));
        }
        log::info!(
            "Synthesized {} bytes of {} speech in {} request(s)",
            audio.len(),
            language.tag(),
            chunks.len()
        );
        Ok(audio)
    }
}

/// Split on whitespace into chunks of at most `max` characters. A single
/// word longer than `max` is cut at character boundaries.
fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max);
            chunks.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.len() } else { word.len() + 1 };
        if current_len + needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("  hello   world ", 100), vec!["hello world"]);
        assert!(split_chunks("   ", 100).is_empty());
    }

    #[test]
    fn chunks_break_on_word_boundaries() {
        let chunks = split_chunks("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn oversized_word_is_cut() {
        let chunks = split_chunks("xy abcdefghij z", 4);
        assert_eq!(chunks, vec!["xy", "abcd", "efgh", "ij z"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "नमस्ते ".repeat(30);
        for chunk in split_chunks(&text, MAX_CHUNK_CHARS) {
            assert!(chunk.chars().count() <= MAX_CHUNK_CHARS);
        }
    }

    #[tokio::test]
    async fn concatenates_chunk_audio() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("tl".into(), "ta".into()),
                Matcher::UrlEncoded("idx".into(), "0".into()),
                Matcher::UrlEncoded("total".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body([1u8, 2, 3])
            .create_async()
            .await;
        let second = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("idx".into(), "1".into()))
            .with_status(200)
            .with_body([4u8, 5])
            .create_async()
            .await;

        let text = format!("{} {}", "a".repeat(60), "b".repeat(60));
        let tts = GoogleTts::new(reqwest::Client::new(), server.url());
        let audio = tts.synthesize(&text, Language::Ta).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(audio, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn blank_text_is_unavailable_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let tts = GoogleTts::new(reqwest::Client::new(), server.url());
        let err = tts.synthesize("  \n ", Language::Hi).await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_failure_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let tts = GoogleTts::new(reqwest::Client::new(), server.url());
        let err = tts.synthesize("hello", Language::En).await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(ref m) if m.contains("503")));
    }
}
