//! Text processing for selective watermarking.
//!
//! This module provides:
//! - Word segmentation with a whitespace fallback
//! - Stopword sets (built-in English list or a file)
//! - Carrier selection (which words may hold payload)

pub mod selector;
pub mod stopwords;
pub mod tokenize;

pub use selector::{CarrierSelector, MIN_CARRIER_LEN};
pub use stopwords::{StopwordSet, ENGLISH_STOPWORDS};
pub use tokenize::{TokenizeError, Tokenizer, WhitespaceTokenizer, WordTokenizer};
