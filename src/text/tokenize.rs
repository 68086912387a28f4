//! Word segmentation for watermarking.
//!
//! Splits a text blob into word-units the carrier selector can judge.
//! Whitespace separates chunks; inside a chunk, runs of punctuation are
//! split away from word characters so that `"fox."` yields `"fox"` and
//! `"."`. An apostrophe or hyphen between two word characters stays in
//! the word (`"don't"`, `"well-known"`).
//!
//! Zero-width watermark marks are ordinary word characters here, so a
//! watermarked word is tokenized back into exactly one unit.

use thiserror::Error;

/// Errors a tokenizer may report.
#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("Tokenizer unavailable: {0}")]
    Unavailable(String),

    #[error("Tokenization failed: {0}")]
    Failed(String),
}

/// Splits text into an ordered sequence of word-units.
///
/// Implementations must be deterministic: the same input always yields the
/// same segmentation.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes `text` into word-units, in order.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError>;
}

/// Default tokenizer separating words from punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

/// Naive whitespace split. Used as the fallback when a tokenizer fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

/// Punctuation outside ASCII that is split away from words.
const EXTRA_PUNCTUATION: &[char] = &[
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2013}', '\u{2014}', '\u{2026}', '\u{00AB}',
    '\u{00BB}', '\u{00BF}', '\u{00A1}',
];

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

/// Characters allowed inside a word when surrounded by word characters.
fn is_joiner(c: char) -> bool {
    c == '\'' || c == '-' || c == '\u{2019}'
}

impl WordTokenizer {
    fn split_chunk(chunk: &str, tokens: &mut Vec<String>) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();
        let mut current_is_word = false;

        for (i, &c) in chars.iter().enumerate() {
            let is_word = if is_joiner(c) {
                i > 0
                    && i + 1 < chars.len()
                    && !is_punctuation(chars[i - 1])
                    && !is_punctuation(chars[i + 1])
            } else {
                !is_punctuation(c)
            };

            if !current.is_empty() && is_word != current_is_word {
                tokens.push(std::mem::take(&mut current));
            }
            current_is_word = is_word;
            current.push(c);
        }

        if !current.is_empty() {
            tokens.push(current);
        }
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            Self::split_chunk(chunk, &mut tokens);
        }
        Ok(tokens)
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}
