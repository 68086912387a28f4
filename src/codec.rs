//! Selective watermark embedding and decoding over flat text.
//!
//! Embedding tokenizes the text, replaces every carrier word with its
//! watermarked form, and joins the tokens back with single spaces. Decoding
//! tokenizes the same way and asks the primitive to extract a payload from
//! every word long enough to have been a carrier.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::{EmbeddingError, Error, Result};
use crate::text::{CarrierSelector, TokenizeError, Tokenizer, WhitespaceTokenizer, WordTokenizer};
use crate::watermark::BlindWatermark;

/// A carrier word recovered during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatermarkedWord {
    /// Zero-based index of the word in the token sequence.
    pub position: usize,
    /// The recovered payload text.
    pub watermark: String,
}

/// Result of decoding a text blob.
///
/// Always well-formed: a text carrying nothing has `watermark_count == 0`
/// and an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    /// Number of word-units in the text.
    pub total_words: usize,
    /// Recovered carriers keyed by their (watermarked) word form, in the
    /// order they appear in the text.
    pub watermarked_words: IndexMap<String, WatermarkedWord>,
    /// Number of recovered carriers.
    pub watermark_count: usize,
}

impl DecodeReport {
    /// Returns true if no carrier was recovered.
    pub fn is_empty(&self) -> bool {
        self.watermark_count == 0
    }

    /// Recovered payloads in position order.
    pub fn payloads(&self) -> Vec<&str> {
        let mut words: Vec<&WatermarkedWord> = self.watermarked_words.values().collect();
        words.sort_by_key(|w| w.position);
        words.into_iter().map(|w| w.watermark.as_str()).collect()
    }
}

/// Embeds and decodes payloads in flat text.
pub struct TextCodec {
    watermark: Arc<dyn BlindWatermark>,
    selector: CarrierSelector,
    tokenizer: Box<dyn Tokenizer>,
    fallback: Box<dyn Tokenizer>,
}

impl TextCodec {
    /// Creates a codec with the default word tokenizer and whitespace fallback.
    pub fn new(watermark: Arc<dyn BlindWatermark>, selector: CarrierSelector) -> Self {
        Self {
            watermark,
            selector,
            tokenizer: Box::new(WordTokenizer),
            fallback: Box::new(WhitespaceTokenizer),
        }
    }

    /// Replaces the primary tokenizer.
    pub fn with_tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Replaces the tokenizer used when the primary one fails.
    pub fn with_fallback_tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.fallback = Box::new(tokenizer);
        self
    }

    pub fn selector(&self) -> &CarrierSelector {
        &self.selector
    }

    /// Splits `text` into words, falling back when the primary tokenizer fails.
    pub fn split_words(&self, text: &str) -> std::result::Result<Vec<String>, TokenizeError> {
        match self.tokenizer.tokenize(text) {
            Ok(words) => Ok(words),
            Err(e) => {
                warn!(error = %e, "tokenizer failed, falling back");
                self.fallback.tokenize(text)
            }
        }
    }

    /// Embeds `payload` into every carrier word of `text`.
    ///
    /// The output has as many tokens as the input; non-carriers are kept
    /// verbatim. If the primitive fails on any word, nothing is returned.
    pub fn embed(&self, text: &str, payload: &str) -> Result<String> {
        let words = self
            .split_words(text)
            .map_err(|e| Error::Embedding(e.into()))?;
        let payload = payload.as_bytes();

        let mut carriers = 0usize;
        let marked = words
            .into_iter()
            .map(|word| {
                if self.selector.is_carrier(&word) {
                    carriers += 1;
                    self.watermark.embed(&word, payload)
                } else {
                    Ok(word)
                }
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(EmbeddingError::from)?;

        debug!(words = marked.len(), carriers, "embedded watermark");
        Ok(marked.join(" "))
    }

    /// Recovers payloads from `text`.
    ///
    /// Words that carry nothing, fail extraction, or hold bytes that are not
    /// UTF-8 are skipped.
    pub fn decode(&self, text: &str) -> Result<DecodeReport> {
        let words = self.split_words(text).map_err(Error::Decoding)?;
        let mut report = DecodeReport {
            total_words: words.len(),
            ..DecodeReport::default()
        };

        for (position, word) in words.into_iter().enumerate() {
            if !self.selector.is_extraction_candidate(&word) {
                continue;
            }

            let payload = match self.watermark.extract(&word) {
                Ok(Some(payload)) if !payload.is_empty() => payload,
                Ok(_) => continue,
                Err(e) => {
                    trace!(position, error = %e, "extraction failed");
                    continue;
                }
            };

            let Ok(watermark) = String::from_utf8(payload) else {
                trace!(position, "recovered payload is not UTF-8");
                continue;
            };

            report
                .watermarked_words
                .insert(word, WatermarkedWord { position, watermark });
        }

        report.watermark_count = report.watermarked_words.len();
        debug!(
            words = report.total_words,
            carriers = report.watermark_count,
            "decoded text"
        );
        Ok(report)
    }
}
