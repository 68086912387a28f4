//! Integration tests for Wordmark
//!
//! Covers the end-to-end behaviour of the engine:
//! - Carrier selection and token preservation in flat text
//! - Payload recovery after embedding
//! - XML and JSON traversal at any depth
//! - Structure preservation and error handling

use std::sync::Arc;
use std::thread;

use serde_json::Value;
use wordmark::text::Tokenizer;
use wordmark::watermark::strip_marks;
use wordmark::{
    CarrierSelector, ContentKind, Decoded, Error, StopwordSet, Watermarker, WordTokenizer,
    WordmarkConfig,
};

const SAMPLES: &[&str] = &[
    "The quick brown fox jumps",
    "Amanda went to the park with her brother yesterday afternoon.",
    "Numbers like 2024 and words like v2 never carry anything; neither does \"the\".",
    "  leading and   irregular\twhitespace\n is normalized  ",
    "Ünïcödé wörds, accents and niños también.",
    "",
];

fn engine() -> Watermarker {
    Watermarker::new(&WordmarkConfig::default()).unwrap()
}

fn tokens(text: &str) -> Vec<String> {
    WordTokenizer.tokenize(text).unwrap()
}

/// Test the sample sentence from start to finish
#[test]
fn test_sample_sentence() {
    let engine = engine();
    let marked = engine.embed_text("The quick brown fox jumps", "tag1").unwrap();

    let words = tokens(&marked);
    assert_eq!(words[0], "The");
    assert_eq!(words[3], "fox");
    assert_eq!(strip_marks(&words[1]), "quick");
    assert_eq!(strip_marks(&words[2]), "brown");
    assert_eq!(strip_marks(&words[4]), "jumps");

    let report = engine.decode_text(&marked).unwrap();
    assert_eq!(report.total_words, 5);
    assert_eq!(report.watermark_count, 3);
    assert!(report.watermarked_words.values().all(|w| w.watermark == "tag1"));
}

/// Test that embedding never changes the number of tokens
#[test]
fn test_token_count_preserved() {
    let engine = engine();
    for text in SAMPLES {
        let marked = engine.embed_text(text, "payload").unwrap();
        assert_eq!(tokens(&marked).len(), tokens(text).len(), "text: {:?}", text);
    }
}

/// Test that non-carrier words come out unchanged at the same position
#[test]
fn test_non_carriers_unchanged() {
    let engine = engine();
    let selector = CarrierSelector::new(StopwordSet::english());

    for text in SAMPLES {
        let before = tokens(text);
        let after = tokens(&engine.embed_text(text, "p").unwrap());

        for (original, output) in before.iter().zip(&after) {
            if selector.is_carrier(original) {
                assert_eq!(&strip_marks(output), original);
            } else {
                assert_eq!(original, output);
            }
        }
    }
}

/// Test payload recovery for every text with at least one carrier
#[test]
fn test_roundtrip_recoverability() {
    let engine = engine();
    let selector = CarrierSelector::default();

    for text in SAMPLES {
        let carriers = tokens(text).iter().filter(|w| selector.is_carrier(w)).count();
        let report = engine
            .decode_text(&engine.embed_text(text, "wm-7 ✓").unwrap())
            .unwrap();

        assert_eq!(report.watermark_count, carriers, "text: {:?}", text);
        if carriers > 0 {
            assert!(report.payloads().contains(&"wm-7 ✓"));
        }
    }
}

/// Test that decoding plain text reports zero carriers instead of failing
#[test]
fn test_decode_plain_text() {
    let report = engine().decode_text("Nothing hidden in these words").unwrap();
    assert_eq!(report.total_words, 5);
    assert_eq!(report.watermark_count, 0);
    assert!(report.watermarked_words.is_empty());
}

/// Test the JSON example: nested fields are found too
#[test]
fn test_json_nested_fields() {
    let engine = engine();
    let doc = br#"{"title": "A quick brown story", "meta": {"title": "nested quick value"}}"#;

    let marked = engine.embed_document(doc, "id42", "title").unwrap();
    let value: Value = serde_json::from_str(&marked).unwrap();
    assert_eq!(strip_marks(value["title"].as_str().unwrap()), "A quick brown story");
    assert_eq!(strip_marks(value["meta"]["title"].as_str().unwrap()), "nested quick value");

    let matches = engine.decode_document(marked.as_bytes(), "title").unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches
        .iter()
        .all(|m| m.analysis.payloads().iter().all(|p| *p == "id42")));
}

/// Test that only the requested key is watermarked
#[test]
fn test_json_other_keys_untouched() {
    let engine = engine();
    let doc = br#"{"title": "quick brown", "body": "quick brown", "items": [{"title": "lighthouse keeper"}, 7, null]}"#;

    let marked = engine.embed_document(doc, "x", "title").unwrap();
    let value: Value = serde_json::from_str(&marked).unwrap();

    assert_eq!(value["body"], "quick brown");
    assert_eq!(value["items"][1], 7);
    assert!(value["items"][2].is_null());
    assert_ne!(value["items"][0]["title"], "lighthouse keeper");

    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["title", "body", "items"]);
}

/// Test the XML example
#[test]
fn test_xml_body() {
    let engine = engine();
    let marked = engine
        .embed_document(b"<doc><body>quick brown fox jumps</body></doc>", "tag1", "body")
        .unwrap();

    let matches = engine.decode_document(marked.as_bytes(), "body").unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].analysis.watermark_count >= 1);
    assert_eq!(strip_marks(&matches[0].text), "quick brown fox jumps");
}

/// Test XML structure, attributes and unrelated text are preserved
#[test]
fn test_xml_structure_preserved() {
    let engine = engine();
    let doc = "<?xml version=\"1.0\"?>\n<feed id=\"1\">\n  <entry>\n    <title>Quiet morning harbour</title>\n    <summary>quick brown</summary>\n  </entry>\n  <entry><title>Evening &amp; lanterns</title></entry>\n</feed>\n";

    let marked = engine.embed_document(doc.as_bytes(), "p", "title").unwrap();
    assert_ne!(marked, doc);
    assert_eq!(strip_marks(&marked), doc);
    assert!(marked.contains("<summary>quick brown</summary>"));

    let matches = engine.decode_document(marked.as_bytes(), "title").unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].analysis.watermark_count, 3);
    // "Evening & lanterns": "&" is not a carrier
    assert_eq!(matches[1].analysis.watermark_count, 2);
    assert_eq!(matches[1].analysis.total_words, 3);
}

/// Test that a field matching nothing leaves the document as it was
#[test]
fn test_absent_field() {
    let engine = engine();

    let json = r#"{"a": [{"b": "quick brown"}], "c": {"d": true}}"#;
    let marked = engine.embed_document(json.as_bytes(), "p", "absent").unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&marked).unwrap(),
        serde_json::from_str::<Value>(json).unwrap()
    );
    assert!(engine.decode_document(json.as_bytes(), "absent").unwrap().is_empty());

    let xml = "<doc><b>quick brown</b></doc>";
    assert_eq!(engine.embed_document(xml.as_bytes(), "p", "absent").unwrap(), xml);
    assert!(engine.decode_document(xml.as_bytes(), "absent").unwrap().is_empty());
}

/// Test JSON output uses four-space indentation by default
#[test]
fn test_json_reindented() {
    let marked = engine()
        .embed_document(br#"{"a":{"b":1}}"#, "p", "absent")
        .unwrap();
    assert_eq!(marked, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
}

/// Test large and precise numbers are written back exactly
#[test]
fn test_json_numbers_untouched() {
    let engine = engine();
    let doc = r#"{"id": 123456789012345678901234567890, "price": 1.10, "title": "quick brown"}"#;

    let marked = engine.embed_document(doc.as_bytes(), "p", "absent").unwrap();
    assert!(marked.contains("123456789012345678901234567890"));
    assert!(marked.contains("1.10"));

    let marked = engine.embed_document(doc.as_bytes(), "p", "title").unwrap();
    assert!(marked.contains("\"id\": 123456789012345678901234567890"));
    assert_eq!(engine.decode_document(marked.as_bytes(), "title").unwrap().len(), 1);
}

/// Test comments and CDATA do not hide an element's text
#[test]
fn test_xml_text_around_comments_and_cdata() {
    let engine = engine();

    let doc = "<doc><body><!-- note -->quick brown lighthouse</body></doc>";
    let marked = engine.embed_document(doc.as_bytes(), "p", "body").unwrap();
    assert_ne!(marked, doc);
    assert_eq!(strip_marks(&marked), doc);

    let matches = engine.decode_document(marked.as_bytes(), "body").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].analysis.watermark_count, 3);

    let doc = "<doc><body>quick <![CDATA[brown]]> lighthouse</body></doc>";
    let marked = engine.embed_document(doc.as_bytes(), "p", "body").unwrap();
    assert_eq!(strip_marks(&marked), "<doc><body>quick brown lighthouse</body></doc>");
    let matches = engine.decode_document(marked.as_bytes(), "body").unwrap();
    assert_eq!(matches[0].analysis.payloads(), vec!["p", "p", "p"]);
}

/// Test error taxonomy for malformed and incomplete input
#[test]
fn test_errors() {
    let engine = engine();

    assert!(matches!(
        engine.embed_document(b"<doc><body>quick</body>", "p", "body"),
        Err(Error::Parse { format: "XML", .. })
    ));
    assert!(matches!(
        engine.decode_document(b"{\"body\": }", "body"),
        Err(Error::Parse { format: "JSON", .. })
    ));
    assert!(matches!(
        engine.embed(b"{}", "p", ContentKind::Tree, None),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        engine.embed_text("quick", ""),
        Err(Error::Validation(_))
    ));
}

/// Test that the error message is a single readable description
#[test]
fn test_error_messages() {
    let err = engine()
        .embed_document(b"<a><b></a>", "p", "b")
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Failed to parse XML document"));
}

/// Test the engine can be shared across threads
#[test]
fn test_shared_engine() {
    let engine = Arc::new(engine());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let payload = format!("thread-{}", i);
                let marked = engine.embed_text("quick brown lighthouse", &payload).unwrap();
                let report = engine.decode_text(&marked).unwrap();
                assert_eq!(report.payloads(), vec![payload.as_str(); 3]);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

/// Test dispatch through ContentKind matches the direct calls
#[test]
fn test_content_kind_dispatch() {
    let engine = engine();
    let marked = engine
        .embed(b"<r><t>quick brown</t></r>", "k", ContentKind::Tree, Some("t"))
        .unwrap();

    match engine.decode(marked.as_bytes(), ContentKind::Tree, Some("t")).unwrap() {
        Decoded::Tree(matches) => {
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].analysis.watermark_count, 2);
        }
        Decoded::Text(_) => panic!("expected tree result"),
    }
}
