//! Verify the codec and merger against JSON test vectors stored in
//! `test-vectors/`.
//!
//! The vectors are shared with the host app's test suite so both sides agree
//! on the wire format and on merge results. Payloads are compared as parsed
//! JSON, links as exact strings.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use thyme_core::{CodecConfig, Link, ListCodec, ListError, ListItem, ListMerger, ToDoList};

fn list_from(value: &Value) -> ToDoList {
    ToDoList {
        name: value["name"].as_str().unwrap().to_string(),
        created_by: value["createdBy"].as_str().unwrap().to_string(),
        items: serde_json::from_value::<Vec<ListItem>>(value["items"].clone()).unwrap(),
    }
}

fn codec_for(case: &Value) -> ListCodec {
    match case.get("config") {
        Some(config) => ListCodec::new(CodecConfig::from_json(&config.to_string()).unwrap()),
        None => ListCodec::default(),
    }
}

fn assert_error_kind(name: &str, err: ListError, expected: &str) {
    let matched = match expected {
        "MalformedPayload" => matches!(err, ListError::MalformedPayload(_)),
        "PayloadTooLarge" => matches!(err, ListError::PayloadTooLarge { .. }),
        "DuplicateItemId" => matches!(err, ListError::DuplicateItemId(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

fn payload_of(link: &Link) -> Value {
    let encoded = link.as_str().split_once("?list=").unwrap().1;
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(encoded).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

#[test]
fn encode_test_vectors() {
    let raw = include_str!("../../test-vectors/codec.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["encode"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let list = list_from(&case["list"]);
        let result = codec_for(case).encode(&list);

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, result.unwrap_err(), expected_error.as_str().unwrap());
            continue;
        }

        let link = result.unwrap();
        assert_eq!(payload_of(&link), case["expected_payload"], "{name}: payload");
        if let Some(expected_link) = case.get("expected_link") {
            assert_eq!(link.as_str(), expected_link.as_str().unwrap(), "{name}: link");
        }
        let back = codec_for(case).decode(&link).unwrap();
        assert_eq!(back, list, "{name}: round trip");
    }
}

#[test]
fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/codec.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["decode"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let payload = case["payload"].as_str().unwrap();
        let link = Link::new(format!(
            "https://thyme.app/list?list={}",
            URL_SAFE_NO_PAD.encode(payload)
        ));
        let result = codec_for(case).decode(&link);

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected = list_from(&case["expected_list"]);
            assert_eq!(result.unwrap(), expected, "{name}: decoded list");
        }
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[test]
fn merge_test_vectors() {
    let raw = include_str!("../../test-vectors/merge.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let local = list_from(&case["local"]);
        let remote = list_from(&case["remote"]);
        let expected = list_from(&case["expected"]);

        let merged = ListMerger::reconcile(&local, &remote).unwrap();
        assert_eq!(merged, expected, "{name}: reconcile(local, remote)");

        if case["symmetric"].as_bool().unwrap_or(false) {
            let flipped = ListMerger::reconcile(&remote, &local).unwrap();
            assert_eq!(flipped, expected, "{name}: reconcile(remote, local)");
        }
    }
}
