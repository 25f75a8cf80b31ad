//! Facade argument validation — every case here must fail (or short-circuit)
//! before any network call, so no engine is required.

use esom::{Es, EsConfig, EsDocument, EsError, SearchInput};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, EsDocument, Serialize, Deserialize)]
struct Anonymous {
    #[es(types = ["text"])]
    body: String,
}

fn client() -> Es {
    Es::new(EsConfig::default()).expect("default config should build")
}

#[test]
fn invalid_url_is_rejected_at_build_time() {
    let config = EsConfig {
        url: "not a url".to_string(),
        ..EsConfig::default()
    };
    assert!(matches!(
        Es::new(config),
        Err(EsError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn empty_index_names_are_rejected() {
    let es = client();
    assert!(matches!(
        es.create_index("").await,
        Err(EsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        es.delete_index("  ").await,
        Err(EsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        es.index_exists("").await,
        Err(EsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        es.search::<Value>("", json!({"match_all": {}})).await,
        Err(EsError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn null_queries_are_rejected() {
    let es = client();
    assert!(matches!(
        es.search::<Value>("articles", Value::Null).await,
        Err(EsError::InvalidArgument { .. })
    ));
    assert!(matches!(
        es.delete_by_query("articles", Value::Null).await,
        Err(EsError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn search_input_requires_an_index() {
    let es = client();
    let err = es
        .search_input::<Value>(SearchInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EsError::InvalidArgument { .. }));
}

#[tokio::test]
async fn empty_bulk_is_reported_as_unsuccessful_without_a_request() {
    let es = client();
    let documents: Vec<Anonymous> = Vec::new();
    let outcome = es.bulk_insert_auto_id("articles", &documents).await.unwrap();
    assert!(!outcome);
}

#[tokio::test]
async fn bulk_without_marker_fails_before_any_network_call() {
    let es = client();
    let documents = vec![Anonymous {
        body: "no id".to_string(),
    }];
    let err = es.bulk_insert("articles", &documents).await.unwrap_err();
    assert!(matches!(err, EsError::MissingIdField { .. }));
}
