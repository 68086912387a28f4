//! Blind watermark primitives.
//!
//! A primitive perturbs a single word so that it carries a payload, and can
//! later recover that payload from the perturbed word alone. The engine only
//! talks to primitives through [`BlindWatermark`].
//!
//! Primitives are shared across calls, so `BlindWatermark` takes `&self` and
//! must be safe for concurrent read-only use. A primitive that needs mutable
//! state implements [`StatefulWatermark`] instead and is wrapped in
//! [`Serialized`], which guards every call with a mutex.

pub mod zero_width;

use std::sync::{Arc, Mutex};

use thiserror::Error;

pub use zero_width::{strip_marks, ZeroWidthWatermark, MARKS};

/// Errors raised by a watermark primitive.
#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("Watermark secret is empty")]
    EmptySecret,

    #[error("Key derivation failed")]
    KeyDerivationFailed,

    #[error("Cannot watermark an empty word")]
    EmptyWord,

    #[error("Word already carries a watermark")]
    AlreadyMarked,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Watermark primitive lock poisoned")]
    Poisoned,

    #[error("Watermark primitive failed: {0}")]
    Failed(String),
}

/// Keyed word-level watermark, safe for shared read-only use.
pub trait BlindWatermark: Send + Sync {
    /// Returns `word` perturbed to carry `payload`.
    fn embed(&self, word: &str, payload: &[u8]) -> Result<String, WatermarkError>;

    /// Recovers the payload carried by `word`.
    ///
    /// `Ok(None)` means the word carries nothing recoverable; that is the
    /// normal outcome for most words and not an error.
    fn extract(&self, word: &str) -> Result<Option<Vec<u8>>, WatermarkError>;
}

impl<T: BlindWatermark + ?Sized> BlindWatermark for Arc<T> {
    fn embed(&self, word: &str, payload: &[u8]) -> Result<String, WatermarkError> {
        (**self).embed(word, payload)
    }

    fn extract(&self, word: &str) -> Result<Option<Vec<u8>>, WatermarkError> {
        (**self).extract(word)
    }
}

/// A primitive whose operations mutate internal state.
pub trait StatefulWatermark: Send {
    fn embed(&mut self, word: &str, payload: &[u8]) -> Result<String, WatermarkError>;

    fn extract(&mut self, word: &str) -> Result<Option<Vec<u8>>, WatermarkError>;
}

/// Serializes access to a [`StatefulWatermark`] behind a mutex.
pub struct Serialized<W> {
    inner: Mutex<W>,
}

impl<W: StatefulWatermark> Serialized<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Consumes the guard and returns the wrapped primitive.
    pub fn into_inner(self) -> Result<W, WatermarkError> {
        self.inner.into_inner().map_err(|_| WatermarkError::Poisoned)
    }
}

impl<W: StatefulWatermark> BlindWatermark for Serialized<W> {
    fn embed(&self, word: &str, payload: &[u8]) -> Result<String, WatermarkError> {
        let mut guard = self.inner.lock().map_err(|_| WatermarkError::Poisoned)?;
        guard.embed(word, payload)
    }

    fn extract(&self, word: &str) -> Result<Option<Vec<u8>>, WatermarkError> {
        let mut guard = self.inner.lock().map_err(|_| WatermarkError::Poisoned)?;
        guard.extract(word)
    }
}
