//! # Wordmark - invisible watermarks for words
//!
//! Wordmark hides a short payload inside selected words of a text, and
//! recovers it later from the watermarked text alone.
//!
//! ## Overview
//!
//! - Text is split into word-units; only **carrier** words (alphabetic,
//!   longer than three characters, not stopwords) are touched
//! - Each carrier is replaced by its watermarked form; everything else is
//!   kept verbatim and tokens are joined with single spaces
//! - The payload is encrypted with a key derived from a secret and written
//!   into the word as zero-width characters
//! - XML and JSON documents are walked recursively: every text value under a
//!   given tag/key, at any depth, is watermarked; structure is preserved
//! - Decoding never fails because a word carries nothing: it reports what
//!   it found, possibly nothing
//!
//! ## Example Usage
//!
//! ```rust
//! use wordmark::{Watermarker, WordmarkConfig};
//!
//! let engine = Watermarker::new(&WordmarkConfig::default()).unwrap();
//!
//! let marked = engine.embed_text("The quick brown fox jumps", "tag1").unwrap();
//! let report = engine.decode_text(&marked).unwrap();
//!
//! assert_eq!(report.total_words, 5);
//! assert_eq!(report.watermark_count, 3);
//!
//! let doc = br#"{"title": "A quick brown story"}"#;
//! let marked = engine.embed_document(doc, "id42", "title").unwrap();
//! let matches = engine.decode_document(marked.as_bytes(), "title").unwrap();
//! assert_eq!(matches.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`text`]: Tokenization, stopwords and carrier selection
//! - [`watermark`]: Blind watermark primitives
//! - [`codec`]: Embedding and decoding over flat text
//! - [`document`]: XML and JSON traversal
//! - [`engine`]: One-stop facade built from [`config`]

pub mod codec;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod text;
pub mod watermark;

// Re-export commonly used types at the crate root
pub use codec::{DecodeReport, TextCodec, WatermarkedWord};
pub use config::{ConfigError, WordmarkConfig};
pub use document::{Document, DocumentFormat, DocumentWalker, TreeMatch};
pub use engine::{ContentKind, Decoded, Watermarker};
pub use error::{EmbeddingError, Error, Result};
pub use text::{CarrierSelector, StopwordSet, Tokenizer, WordTokenizer};
pub use watermark::{BlindWatermark, Serialized, StatefulWatermark, WatermarkError, ZeroWidthWatermark};
