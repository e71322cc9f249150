use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, Thesaurus, WordRelations};
use crate::error::ServiceError;
use crate::language::Language;

/// At most this many synonyms and this many antonyms are returned.
const MAX_RELATIONS: usize = 10;

#[derive(Deserialize)]
struct DatamuseWord {
    word: String,
}

/// English word relations from the Datamuse API. Every other language, and
/// every failure, yields empty lists.
pub struct Datamuse {
    client: reqwest::Client,
    url: String,
}

impl Datamuse {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn related(&self, relation: &str, word: &str) -> Result<Vec<String>, ServiceError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[(relation, word), ("max", "50")])
            .send()
            .await?;
        let words: Vec<DatamuseWord> = check_status(resp, "Thesaurus").await?.json().await?;

        let mut out: Vec<String> = Vec::new();
        for w in words {
            if !out.contains(&w.word) {
                out.push(w.word);
            }
            if out.len() == MAX_RELATIONS {
                break;
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Thesaurus for Datamuse {
    async fn lookup(&self, word: &str, language: Language) -> WordRelations {
        let word = word.trim();
        if language != Language::En || word.is_empty() {
            return WordRelations::default();
        }

        let lists = futures_util::future::try_join(
            self.related("rel_syn", word),
            self.related("rel_ant", word),
        )
        .await;

        match lists {
            Ok((synonyms, antonyms)) => WordRelations { synonyms, antonyms },
            Err(e) => {
                log::warn!("Thesaurus lookup for '{word}' failed, returning nothing: {e}");
                WordRelations::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn returns_deduplicated_capped_lists() {
        let mut server = mockito::Server::new_async().await;
        let many: Vec<String> = (0..15).map(|i| format!(r#"{{"word":"w{i}"}}"#)).collect();
        let syn = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("rel_syn".into(), "happy".into()))
            .with_status(200)
            .with_body(format!(
                r#"[{{"word":"glad"}},{{"word":"glad"}},{}]"#,
                many.join(",")
            ))
            .create_async()
            .await;
        let ant = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("rel_ant".into(), "happy".into()))
            .with_status(200)
            .with_body(r#"[{"word":"unhappy","score":100},{"word":"sad"}]"#)
            .create_async()
            .await;

        let thesaurus = Datamuse::new(reqwest::Client::new(), server.url());
        let rel = thesaurus.lookup("happy", Language::En).await;

        syn.assert_async().await;
        ant.assert_async().await;
        assert_eq!(rel.synonyms.len(), MAX_RELATIONS);
        assert_eq!(rel.synonyms[0], "glad");
        assert_eq!(rel.synonyms[1], "w0");
        assert_eq!(rel.antonyms, vec!["unhappy", "sad"]);
    }

    #[tokio::test]
    async fn other_languages_skip_the_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let thesaurus = Datamuse::new(reqwest::Client::new(), server.url());
        let rel = thesaurus.lookup("खुश", Language::Hi).await;

        mock.assert_async().await;
        assert!(rel.is_empty());
    }

    #[tokio::test]
    async fn failures_degrade_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let thesaurus = Datamuse::new(reqwest::Client::new(), server.url());
        assert!(thesaurus.lookup("happy", Language::En).await.is_empty());

        let unreachable = Datamuse::new(reqwest::Client::new(), "http://127.0.0.1:9");
        assert!(unreachable.lookup("happy", Language::En).await.is_empty());
    }
}
