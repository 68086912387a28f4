//! High-level watermarking facade.
//!
//! [`Watermarker`] is built once from a [`WordmarkConfig`]: the secret keys a
//! single shared primitive and the stopword list is loaded up front. Each
//! embed or decode call is independent of every other.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::codec::{DecodeReport, TextCodec};
use crate::config::WordmarkConfig;
use crate::document::{as_text, DocumentWalker, TreeMatch, DEFAULT_JSON_INDENT};
use crate::error::{Error, Result};
use crate::text::{CarrierSelector, StopwordSet};
use crate::watermark::{BlindWatermark, ZeroWidthWatermark};

/// How input content should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A flat text blob.
    Text,
    /// An XML or JSON document (format sniffed from the content).
    Tree,
}

impl ContentKind {
    /// `.txt` files are flat text; everything else is a structured document.
    pub fn from_path(path: &Path) -> Self {
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

        if is_text {
            ContentKind::Text
        } else {
            ContentKind::Tree
        }
    }
}

/// Result of decoding some content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text(DecodeReport),
    Tree(Vec<TreeMatch>),
}

/// Embeds and decodes watermarks in text, XML and JSON content.
pub struct Watermarker {
    codec: TextCodec,
    json_indent: usize,
}

impl Watermarker {
    /// Builds an engine from configuration.
    pub fn new(config: &WordmarkConfig) -> Result<Self> {
        let watermark = ZeroWidthWatermark::new(&config.secret)
            .map_err(|e| Error::validation(format!("invalid watermark secret: {}", e)))?;
        let stopwords = StopwordSet::load_or_default(config.stopwords.as_deref());

        Ok(Self::with_codec(
            TextCodec::new(Arc::new(watermark), CarrierSelector::new(stopwords)),
            config.json_indent,
        ))
    }

    /// Builds an engine around any primitive.
    pub fn with_watermark(watermark: Arc<dyn BlindWatermark>, stopwords: StopwordSet) -> Self {
        Self::with_codec(
            TextCodec::new(watermark, CarrierSelector::new(stopwords)),
            DEFAULT_JSON_INDENT,
        )
    }

    pub fn with_codec(codec: TextCodec, json_indent: usize) -> Self {
        Self { codec, json_indent }
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    fn walker(&self) -> DocumentWalker<'_> {
        DocumentWalker::new(&self.codec).with_json_indent(self.json_indent)
    }

    /// Watermarks a flat text blob.
    pub fn embed_text(&self, text: &str, payload: &str) -> Result<String> {
        require_payload(payload)?;
        let marked = self.codec.embed(text, payload)?;
        info!("embedded watermark in text");
        Ok(marked)
    }

    /// Decodes a flat text blob.
    pub fn decode_text(&self, text: &str) -> Result<DecodeReport> {
        let report = self.codec.decode(text)?;
        info!(carriers = report.watermark_count, "decoded text");
        Ok(report)
    }

    /// Watermarks text values under `field` in an XML or JSON document.
    pub fn embed_document(&self, content: &[u8], payload: &str, field: &str) -> Result<String> {
        require_payload(payload)?;
        self.walker().embed_in_tree(content, payload, field)
    }

    /// Decodes text values under `field` in an XML or JSON document.
    pub fn decode_document(&self, content: &[u8], field: &str) -> Result<Vec<TreeMatch>> {
        self.walker().decode_from_tree(content, field)
    }

    /// Embeds according to `kind`. `field` is required for [`ContentKind::Tree`].
    pub fn embed(
        &self,
        content: &[u8],
        payload: &str,
        kind: ContentKind,
        field: Option<&str>,
    ) -> Result<String> {
        match kind {
            ContentKind::Text => self.embed_text(as_text(content)?, payload),
            ContentKind::Tree => self.embed_document(content, payload, field.unwrap_or_default()),
        }
    }

    /// Decodes according to `kind`. `field` is required for [`ContentKind::Tree`].
    pub fn decode(&self, content: &[u8], kind: ContentKind, field: Option<&str>) -> Result<Decoded> {
        match kind {
            ContentKind::Text => self.decode_text(as_text(content)?).map(Decoded::Text),
            ContentKind::Tree => self
                .decode_document(content, field.unwrap_or_default())
                .map(Decoded::Tree),
        }
    }
}

fn require_payload(payload: &str) -> Result<()> {
    if payload.is_empty() {
        return Err(Error::validation("watermark text must not be empty"));
    }
    Ok(())
}
