//! Depth-first traversal of JSON values.
//!
//! A string value qualifies when its key equals the field name. Every other
//! value is searched recursively; arrays recurse into all elements.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{EmbeddingError, Error, Result};

/// Parses a JSON document, keeping key order and the exact text of numbers.
pub fn parse(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::parse("JSON", e))
}

/// Visits every qualifying string in document order.
pub fn for_each_text<F>(value: &Value, field: &str, f: &mut F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(text) if key == field => f(text)?,
                    other => for_each_text(other, field, f)?,
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                for_each_text(item, field, f)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Visits every qualifying string in document order, allowing replacement.
pub fn for_each_text_mut<F>(value: &mut Value, field: &str, f: &mut F) -> Result<()>
where
    F: FnMut(&mut String) -> Result<()>,
{
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::String(text) if key == field => f(text)?,
                    other => for_each_text_mut(other, field, f)?,
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                for_each_text_mut(item, field, f)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Serializes with `indent` spaces per level; `0` gives compact output.
pub fn to_string(value: &Value, indent: usize) -> Result<String> {
    let serialize_error = |e: serde_json::Error| Error::Embedding(EmbeddingError::Serialize(e.to_string()));

    if indent == 0 {
        return serde_json::to_string(value).map_err(serialize_error);
    }

    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer).map_err(serialize_error)?;

    String::from_utf8(out).map_err(|e| Error::Embedding(EmbeddingError::Serialize(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(value: &Value, field: &str) -> Vec<String> {
        let mut out = Vec::new();
        for_each_text(value, field, &mut |t: &str| {
            out.push(t.to_string());
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn test_finds_nested_fields() {
        let value = json!({
            "title": "top",
            "meta": {"title": "nested"},
            "items": [{"title": "first"}, [{"title": "deep"}]],
        });
        assert_eq!(texts(&value, "title"), vec!["top", "nested", "first", "deep"]);
    }

    #[test]
    fn test_non_string_field_values_are_searched() {
        let value = json!({
            "title": {"title": "inner"},
            "other": {"title": 5},
            "list": {"title": ["x"]},
        });
        assert_eq!(texts(&value, "title"), vec!["inner"]);
    }

    #[test]
    fn test_array_strings_do_not_qualify() {
        let value = json!(["title", "text"]);
        assert!(texts(&value, "title").is_empty());
    }

    #[test]
    fn test_replacement_keeps_key_order() {
        let mut value = parse(r#"{"z": 1, "title": "a", "m": {"title": "b"}, "a": 2}"#).unwrap();
        for_each_text_mut(&mut value, "title", &mut |t: &mut String| {
            t.push('!');
            Ok(())
        })
        .unwrap();
        assert_eq!(
            to_string(&value, 0).unwrap(),
            r#"{"z":1,"title":"a!","m":{"title":"b!"},"a":2}"#
        );
    }

    #[test]
    fn test_indentation() {
        let value = json!({"a": [1]});
        assert_eq!(to_string(&value, 4).unwrap(), "{\n    \"a\": [\n        1\n    ]\n}");
        assert_eq!(to_string(&value, 2).unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_numbers_survive_reserialization() {
        let doc = r#"{"id": 123456789012345678901234567890, "price": 1.10, "x": "y"}"#;
        let value = parse(doc).unwrap();
        assert_eq!(
            to_string(&value, 0).unwrap(),
            r#"{"id":123456789012345678901234567890,"price":1.10,"x":"y"}"#
        );
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = parse("{\"a\": ").unwrap_err();
        assert!(matches!(err, Error::Parse { format: "JSON", .. }));
    }
}
