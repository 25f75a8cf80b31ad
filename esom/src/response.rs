//! Typed model of the search response wire format.

use std::collections::HashMap;

use serde::Deserialize;

/// A deserialized `_search` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    pub hits: HitsMetadata<T>,
}

impl<T> SearchResponse<T> {
    /// Total hit count as reported by the engine (0 when tracking is off).
    pub fn total(&self) -> u64 {
        self.hits.total.as_ref().map(|total| total.value).unwrap_or(0)
    }

    /// Consume the response, yielding the hit sources in result order.
    pub fn documents(self) -> Vec<T> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct HitsMetadata<T> {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    #[serde(default)]
    pub relation: String,
}

/// A single search hit. `highlight` holds the per-field fragment lists the
/// engine returned when the request asked for highlighting.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Hit<T> {
    #[serde(rename = "_index", default)]
    pub index: String,
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Option<T>,
    #[serde(default)]
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_a_search_response() {
        let body = json!({
            "took": 3,
            "timed_out": false,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.5,
                "hits": [
                    {
                        "_index": "articles",
                        "_id": "1",
                        "_score": 1.5,
                        "_source": {"title": "hello"},
                        "highlight": {"title": ["<em>hello</em>"]}
                    },
                    {"_index": "articles", "_id": "2", "_source": {"title": "world"}}
                ]
            }
        });

        let response: SearchResponse<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert_eq!(response.total(), 2);
        assert_eq!(response.hits.hits.len(), 2);
        assert_eq!(response.hits.hits[0].id, "1");
        assert!(response.hits.hits[0].highlight.is_some());
        assert!(response.hits.hits[1].highlight.is_none());
        assert_eq!(response.documents().len(), 2);
    }

    #[test]
    fn tolerates_missing_total() {
        let body = json!({"hits": {"hits": []}});
        let response: SearchResponse<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert_eq!(response.total(), 0);
        assert!(response.hits.hits.is_empty());
    }
}
