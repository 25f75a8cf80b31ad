//! Bulk request body construction.

use esom::{bulk_operations, EsDocument, EsError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, EsDocument, Serialize, Deserialize)]
struct Note {
    #[es(id)]
    id: Option<String>,
    #[es(types = ["text"])]
    body: String,
}

#[derive(Debug, Default, EsDocument, Serialize, Deserialize)]
struct Metric {
    #[es(id)]
    sequence: u64,
    #[es(types = ["double"])]
    value: f64,
}

#[derive(Debug, Default, EsDocument, Serialize, Deserialize)]
struct Anonymous {
    #[es(types = ["text"])]
    body: String,
}

#[test]
fn pairs_action_and_source_lines() {
    let notes = vec![
        Note {
            id: Some("n-1".to_string()),
            body: "first".to_string(),
        },
        Note {
            id: Some("n-2".to_string()),
            body: "second".to_string(),
        },
    ];

    let operations = bulk_operations(&notes, false).unwrap();
    assert_eq!(operations.len(), 4);
    assert_eq!(operations[0], json!({"index": {"_id": "n-1"}}));
    assert_eq!(operations[1], json!({"id": "n-1", "body": "first"}));
    assert_eq!(operations[2], json!({"index": {"_id": "n-2"}}));
}

#[test]
fn documents_without_an_id_value_are_skipped() {
    let notes = vec![
        Note {
            id: None,
            body: "orphan".to_string(),
        },
        Note {
            id: Some("n-9".to_string()),
            body: "kept".to_string(),
        },
    ];

    let operations = bulk_operations(&notes, false).unwrap();
    assert_eq!(operations.len(), 2);
    assert_eq!(operations[0], json!({"index": {"_id": "n-9"}}));
}

#[test]
fn numeric_identifiers_are_stringified() {
    let metrics = vec![Metric {
        sequence: 42,
        value: 1.5,
    }];
    let operations = bulk_operations(&metrics, false).unwrap();
    assert_eq!(operations[0], json!({"index": {"_id": "42"}}));
}

#[test]
fn missing_marker_fails_before_anything_is_built() {
    let documents = vec![Anonymous {
        body: "no id".to_string(),
    }];
    let err = bulk_operations(&documents, false).unwrap_err();
    match err {
        EsError::MissingIdField { type_name } => assert_eq!(type_name, "Anonymous"),
        other => panic!("expected MissingIdField, got {other}"),
    }
}

#[test]
fn auto_id_mode_needs_no_marker() {
    let documents = vec![
        Anonymous {
            body: "a".to_string(),
        },
        Anonymous {
            body: "b".to_string(),
        },
    ];
    let operations = bulk_operations(&documents, true).unwrap();
    assert_eq!(operations.len(), 4);
    assert_eq!(operations[0], json!({"index": {}}));
    assert_eq!(operations[1], json!({"body": "a"}));
}
