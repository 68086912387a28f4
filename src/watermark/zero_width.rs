//! Zero-width character watermark.
//!
//! The payload is encrypted with a key derived from the secret, and the
//! resulting frame is written into the word as invisible characters:
//!
//! Frame: [12 bytes nonce] + [ciphertext + 16 bytes tag]
//! Each frame byte becomes four 2-bit symbols, most significant first,
//! each symbol one of [`MARKS`]. The run of marks is inserted at a random
//! position after the first visible character.
//!
//! A word without marks, or whose marks do not authenticate under the key,
//! carries nothing.

use std::fmt;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::Sha256;
use zeroize::Zeroize;

use super::{BlindWatermark, WatermarkError};

/// HKDF salt for the watermark key.
const HKDF_SALT: &[u8] = b"WORDMARK-V1-SALT";

/// HKDF info string for the watermark key.
const HKDF_INFO: &[u8] = b"WORDMARK-V1-ZERO-WIDTH";

/// Nonce size for ChaCha20Poly1305.
const NONCE_SIZE: usize = 12;

/// Authentication tag size for ChaCha20Poly1305.
const TAG_SIZE: usize = 16;

/// Symbols per frame byte.
const SYMBOLS_PER_BYTE: usize = 4;

/// Zero-width code points, indexed by the 2-bit value they encode.
pub const MARKS: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}'];

fn symbol_value(c: char) -> Option<u8> {
    MARKS.iter().position(|&m| m == c).map(|v| v as u8)
}

/// Removes every watermark mark from `word`, restoring its visible form.
pub fn strip_marks(word: &str) -> String {
    word.chars().filter(|c| symbol_value(*c).is_none()).collect()
}

/// Keyed zero-width watermark primitive.
pub struct ZeroWidthWatermark {
    cipher: ChaCha20Poly1305,
}

impl fmt::Debug for ZeroWidthWatermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroWidthWatermark").finish_non_exhaustive()
    }
}

impl ZeroWidthWatermark {
    /// Creates a primitive keyed by `secret`.
    pub fn new(secret: &str) -> Result<Self, WatermarkError> {
        if secret.is_empty() {
            return Err(WatermarkError::EmptySecret);
        }

        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), secret.as_bytes());
        let mut key = [0u8; 32];
        hk.expand(HKDF_INFO, &mut key)
            .map_err(|_| WatermarkError::KeyDerivationFailed)?;

        let cipher = ChaCha20Poly1305::new_from_slice(&key)
            .map_err(|_| WatermarkError::KeyDerivationFailed);
        key.zeroize();

        Ok(Self { cipher: cipher? })
    }

    fn encode_marks(frame: &[u8]) -> String {
        let mut marks = String::with_capacity(frame.len() * SYMBOLS_PER_BYTE * 3);
        for byte in frame {
            for shift in [6u8, 4, 2, 0] {
                marks.push(MARKS[((byte >> shift) & 0b11) as usize]);
            }
        }
        marks
    }

    fn decode_marks(word: &str) -> Option<Vec<u8>> {
        let symbols: Vec<u8> = word.chars().filter_map(symbol_value).collect();
        if symbols.is_empty() || symbols.len() % SYMBOLS_PER_BYTE != 0 {
            return None;
        }

        Some(
            symbols
                .chunks(SYMBOLS_PER_BYTE)
                .map(|chunk| chunk.iter().fold(0u8, |acc, s| (acc << 2) | s))
                .collect(),
        )
    }
}

impl BlindWatermark for ZeroWidthWatermark {
    fn embed(&self, word: &str, payload: &[u8]) -> Result<String, WatermarkError> {
        if word.is_empty() {
            return Err(WatermarkError::EmptyWord);
        }
        if word.chars().any(|c| symbol_value(c).is_some()) {
            return Err(WatermarkError::AlreadyMarked);
        }

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), payload)
            .map_err(|e| WatermarkError::EncryptionFailed(e.to_string()))?;

        let mut frame = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        frame.extend_from_slice(&nonce_bytes);
        frame.extend_from_slice(&ciphertext);
        let marks = Self::encode_marks(&frame);

        let chars: Vec<char> = word.chars().collect();
        let insert_at = if chars.len() > 1 {
            rand::thread_rng().gen_range(1..chars.len())
        } else {
            chars.len()
        };

        let mut marked = String::with_capacity(word.len() + marks.len());
        marked.extend(&chars[..insert_at]);
        marked.push_str(&marks);
        marked.extend(&chars[insert_at..]);
        Ok(marked)
    }

    fn extract(&self, word: &str) -> Result<Option<Vec<u8>>, WatermarkError> {
        let Some(frame) = Self::decode_marks(word) else {
            return Ok(None);
        };
        if frame.len() < NONCE_SIZE + TAG_SIZE {
            return Ok(None);
        }

        let (nonce, ciphertext) = frame.split_at(NONCE_SIZE);
        Ok(self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok())
    }
}
