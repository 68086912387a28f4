//! Stopword set used to exclude common words from carrying payload.
//!
//! The primary source is a plain-text file (one word per line, `#` starts a
//! comment). When no file is configured or it cannot be read, the built-in
//! English list is used instead.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Built-in English stopwords.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// A set of lowercase stopwords.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordSet {
    /// The built-in English set.
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Builds a set from arbitrary words (lowercased on insert).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parses a stopword list: one word per line, blank lines and `#` comments ignored.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(|line| line.split('#').next().unwrap_or(""))
                .filter(|line| !line.trim().is_empty()),
        )
    }

    /// Loads a stopword list from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Loads from `path` when given, falling back to the built-in set if the
    /// file is missing, unreadable or empty.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::english();
        };

        match Self::from_file(path) {
            Ok(set) if !set.is_empty() => {
                debug!(path = %path.display(), count = set.len(), "loaded stopwords");
                set
            }
            Ok(_) => {
                warn!(path = %path.display(), "stopword file is empty, using built-in list");
                Self::english()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stopwords unavailable, using built-in list");
                Self::english()
            }
        }
    }

    /// Returns true if `word_lowercased` is a stopword.
    ///
    /// The argument is expected to already be lowercase.
    pub fn contains(&self, word_lowercased: &str) -> bool {
        self.words.contains(word_lowercased)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
