//! Lightweight text utilities: summary, keywords, sentiment, and plain-text
//! extraction from uploaded documents. These are heuristics, not NLP.

use quick_xml::events::Event;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::TextError;

const SUMMARY_SENTENCES: usize = 3;
const MIN_KEYWORD_CHARS: usize = 6;
const MAX_KEYWORDS: usize = 10;
const POSITIVE_WORDS: [&str; 4] = ["good", "great", "excellent", "happy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    NeutralOrNegative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => f.write_str("positive"),
            Sentiment::NeutralOrNegative => f.write_str("neutral/negative"),
        }
    }
}

/// Keep the first three `.`-separated pieces. Text with three or fewer
/// pieces is returned unchanged.
pub fn summarize(text: &str) -> String {
    let pieces: Vec<&str> = text.split('.').collect();
    if pieces.len() > SUMMARY_SENTENCES {
        format!("{}.", pieces[..SUMMARY_SENTENCES].join(". "))
    } else {
        text.to_string()
    }
}

/// Distinct words longer than five characters, in order of first use.
pub fn keywords(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() >= MIN_KEYWORD_CHARS && !out.iter().any(|w| w == word) {
            out.push(word.to_string());
            if out.len() == MAX_KEYWORDS {
                break;
            }
        }
    }
    out
}

/// Positive if any cue word appears anywhere, including inside other words.
pub fn sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    if POSITIVE_WORDS.iter().any(|w| lower.contains(w)) {
        Sentiment::Positive
    } else {
        Sentiment::NeutralOrNegative
    }
}

/// Read the text of an uploaded `.txt` or `.docx` file.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, TextError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => String::from_utf8(bytes.to_vec())
            .map_err(|e| TextError::Decode(format!("{file_name} is not UTF-8: {e}"))),
        "docx" => docx_text(bytes),
        _ => Err(TextError::UnsupportedFormat(file_name.to_string())),
    }
}

/// Paragraphs of `word/document.xml`, one per line.
fn docx_text(bytes: &[u8]) -> Result<String, TextError> {
    let decode = |e: &dyn fmt::Display| TextError::Decode(e.to_string());

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| decode(&e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| decode(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| decode(&e))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| decode(&e))? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => {
                current.push_str(&t.unescape().map_err(|e| decode(&e))?);
            }
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => current.push('\t'),
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
