//! Abstract translation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{PubFetchError, Result};
use crate::retry::{RetryConfig, with_retry};

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh-CN";

/// Longest text sent in a single translation request, in characters
pub const MAX_CHUNK_CHARS: usize = 5000;

/// Placeholder stored when every translation attempt failed
pub const TRANSLATE_FAILED: &str = "translate failed";

/// A service turning English text into the target language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Client for the public Google translate endpoint
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    target: String,
    max_chunk_chars: usize,
    retry_config: RetryConfig,
}

impl GoogleTranslator {
    /// Translator into simplified Chinese, retrying 4 times one second apart
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(format!("pubfetch/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_TRANSLATE_URL.to_string(),
            target: DEFAULT_TARGET_LANGUAGE.to_string(),
            max_chunk_chars: MAX_CHUNK_CHARS,
            retry_config: RetryConfig::fixed(4, Duration::from_secs(1)),
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_target<S: Into<String>>(mut self, target: S) -> Self {
        self.target = target.into();
        self
    }

    /// Longest text sent per request; longer text is split on lines, then sentences
    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    async fn translate_chunk(&self, text: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url);

        with_retry(
            || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("client", "gtx"),
                        ("sl", "auto"),
                        ("tl", self.target.as_str()),
                        ("dt", "t"),
                        ("q", text),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(PubFetchError::ApiError {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    });
                }

                let payload: Value = response.json().await?;
                extract_translation(&payload).ok_or_else(|| PubFetchError::TranslationError {
                    message: "response carries no translated segments".to_string(),
                })
            },
            &self.retry_config,
            "translation request",
        )
        .await
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    async fn translate(&self, text: &str) -> Result<String> {
        let chunks = split_text(text, self.max_chunk_chars);
        if chunks.len() > 1 {
            debug!(chunks = chunks.len(), "Splitting text for translation");
        }

        let mut translated = String::new();
        for chunk in &chunks {
            translated.push_str(self.translate_chunk(&chunk.text).await?.trim_end());
            translated.push_str(chunk.separator);
        }
        Ok(translated)
    }
}

/// Concatenate the translated segments of a `translate_a/single` payload
///
/// The payload is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn extract_translation(payload: &Value) -> Option<String> {
    let translated: String = payload
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}

/// A piece of text sent in one request, plus the separator that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// `"\n"` after the last sentence of a line, `" "` inside a line, `""` at the end
    pub separator: &'static str,
}

impl Chunk {
    fn new(text: &str, separator: &'static str) -> Self {
        Self {
            text: text.to_string(),
            separator,
        }
    }
}

/// Split `text` into chunks of at most `max_chars`
///
/// Lines are kept together when they fit; longer lines break on sentence
/// boundaries. Joining every `text + separator` gives back the input with
/// whitespace around the breaks normalized. A single sentence longer than
/// `max_chars` is kept whole.
pub fn split_text(text: &str, max_chars: usize) -> Vec<Chunk> {
    if text.chars().count() <= max_chars {
        return vec![Chunk::new(text, "")];
    }

    let mut units: Vec<(&str, &'static str)> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let pieces = if line.chars().count() <= max_chars {
            vec![line]
        } else {
            sentences(line)
        };
        let Some((last, init)) = pieces.split_last() else {
            continue;
        };
        units.extend(init.iter().map(|piece| (*piece, " ")));
        units.push((*last, "\n"));
    }
    if let Some(last) = units.last_mut() {
        last.1 = "";
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    for (unit, separator) in units {
        let fits = |chunk: &&mut Chunk| {
            chunk.text.chars().count() + chunk.separator.len() + unit.chars().count() <= max_chars
        };
        if let Some(chunk) = chunks.last_mut().filter(fits) {
            chunk.text.push_str(chunk.separator);
            chunk.text.push_str(unit);
            chunk.separator = separator;
        } else {
            chunks.push(Chunk::new(unit, separator));
        }
    }
    chunks
}

/// Sentences ending in `.`, `!` or `?` followed by whitespace
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}
