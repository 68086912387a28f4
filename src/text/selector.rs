//! Carrier eligibility.
//!
//! A word carries payload only when it is long enough, purely alphabetic,
//! and not a stopword. Eligibility depends on the surface form alone.

use super::stopwords::StopwordSet;

/// A word must have more than this many characters to be a carrier.
pub const MIN_CARRIER_LEN: usize = 3;

/// Decides which word-units may carry payload.
#[derive(Debug, Clone, Default)]
pub struct CarrierSelector {
    stopwords: StopwordSet,
}

impl CarrierSelector {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Returns true if `word` is eligible to carry payload.
    pub fn is_carrier(&self, word: &str) -> bool {
        exceeds_min_len(word)
            && word.chars().all(char::is_alphabetic)
            && !self.stopwords.contains(&word.to_lowercase())
    }

    /// Returns true if extraction should be attempted on `word` when decoding.
    ///
    /// Only the length gate applies: an embedded word no longer looks
    /// alphabetic, and its visible part may collide with a stopword.
    pub fn is_extraction_candidate(&self, word: &str) -> bool {
        exceeds_min_len(word)
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }
}

fn exceeds_min_len(word: &str) -> bool {
    word.chars().count() > MIN_CARRIER_LEN
}
