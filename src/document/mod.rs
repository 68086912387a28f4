//! Watermarking inside structured documents.
//!
//! A document is sniffed once at the boundary: a leading `<` means XML,
//! anything else is parsed as JSON. The walker then visits every text value
//! under the requested field (JSON key) or tag (XML element name), at any
//! depth, and hands it to the [`TextCodec`].
//!
//! Documents are parsed completely before anything is touched, so malformed
//! input never yields partial output.

pub mod json;
pub mod xml;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::codec::{DecodeReport, TextCodec};
use crate::error::{Error, Result};

pub use xml::XmlTree;

/// Default indentation for re-serialized JSON.
pub const DEFAULT_JSON_INDENT: usize = 4;

/// Structured document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Xml => write!(f, "XML"),
            DocumentFormat::Json => write!(f, "JSON"),
        }
    }
}

/// A parsed structured document.
#[derive(Debug, Clone)]
pub enum Document {
    Xml(XmlTree),
    Json(Value),
}

/// One qualifying text value and what was recovered from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeMatch {
    pub text: String,
    pub analysis: DecodeReport,
}

impl Document {
    /// Detects the format structurally and parses the whole document.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}');
        if content.trim_start().starts_with('<') {
            Ok(Document::Xml(XmlTree::parse(content)?))
        } else {
            Ok(Document::Json(json::parse(content)?))
        }
    }

    pub fn format(&self) -> DocumentFormat {
        match self {
            Document::Xml(_) => DocumentFormat::Xml,
            Document::Json(_) => DocumentFormat::Json,
        }
    }

    /// Embeds `payload` into every text value under `field`.
    ///
    /// Returns the number of text values watermarked.
    pub fn embed(&mut self, codec: &TextCodec, payload: &str, field: &str) -> Result<usize> {
        let mut count = 0;
        match self {
            Document::Xml(tree) => tree.for_each_text_mut(field, |text: &mut String| {
                *text = codec.embed(text, payload)?;
                count += 1;
                Ok(())
            })?,
            Document::Json(value) => json::for_each_text_mut(value, field, &mut |text: &mut String| {
                *text = codec.embed(text, payload)?;
                count += 1;
                Ok(())
            })?,
        }
        Ok(count)
    }

    /// Decodes every text value under `field`, in traversal order.
    pub fn decode(&self, codec: &TextCodec, field: &str) -> Result<Vec<TreeMatch>> {
        let mut matches = Vec::new();
        let mut analyze = |text: &str| -> Result<()> {
            matches.push(TreeMatch {
                text: text.to_string(),
                analysis: codec.decode(text)?,
            });
            Ok(())
        };

        match self {
            Document::Xml(tree) => tree.for_each_text(field, &mut analyze)?,
            Document::Json(value) => json::for_each_text(value, field, &mut analyze)?,
        }
        Ok(matches)
    }

    /// Serializes the document in its original format.
    pub fn serialize(&self, json_indent: usize) -> Result<String> {
        match self {
            Document::Xml(tree) => tree.to_xml(),
            Document::Json(value) => json::to_string(value, json_indent),
        }
    }
}

/// Applies the text codec across XML and JSON documents.
pub struct DocumentWalker<'a> {
    codec: &'a TextCodec,
    json_indent: usize,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(codec: &'a TextCodec) -> Self {
        Self {
            codec,
            json_indent: DEFAULT_JSON_INDENT,
        }
    }

    /// Sets the indentation used when writing JSON back out.
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.json_indent = indent;
        self
    }

    /// Watermarks every text value under `field` and re-serializes the document.
    ///
    /// A field that matches nothing returns the document unchanged (modulo
    /// JSON formatting).
    pub fn embed_in_tree(&self, content: &[u8], payload: &str, field: &str) -> Result<String> {
        let content = as_text(content)?;
        require_field(field)?;

        let mut document = Document::parse(content)?;
        let count = document.embed(self.codec, payload, field)?;
        info!(format = %document.format(), field, nodes = count, "embedded watermark");

        document.serialize(self.json_indent)
    }

    /// Decodes every text value under `field`. The document is not modified.
    pub fn decode_from_tree(&self, content: &[u8], field: &str) -> Result<Vec<TreeMatch>> {
        let content = as_text(content)?;
        require_field(field)?;

        let document = Document::parse(content)?;
        let matches = document.decode(self.codec, field)?;
        info!(format = %document.format(), field, nodes = matches.len(), "decoded document");

        Ok(matches)
    }
}

/// Interprets raw bytes as UTF-8 text.
pub fn as_text(content: &[u8]) -> Result<&str> {
    std::str::from_utf8(content).map_err(|e| Error::parse("UTF-8", e))
}

fn require_field(field: &str) -> Result<()> {
    if field.trim().is_empty() {
        return Err(Error::validation("a field or tag name is required for XML and JSON documents"));
    }
    Ok(())
}
