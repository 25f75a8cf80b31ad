use serde_json::{Map, Value};

use crate::errors::EsError;

/// Builder-style search parameters for [`Es::search_input`](super::Es::search_input).
///
/// Only the pieces that are set end up in the request body; an input with
/// nothing but an index produces a match-all search.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub indices: Vec<String>,
    pub query: Option<Value>,
    pub aggregations: Option<Value>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<Value>,
    pub highlight: Option<Value>,
    pub track_total_hits: Option<bool>,
}

impl SearchInput {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            indices: vec![index.into()],
            ..Self::default()
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn aggregations(mut self, aggregations: Value) -> Self {
        self.aggregations = Some(aggregations);
        self
    }

    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn highlight(mut self, highlight: Value) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn track_total_hits(mut self, enabled: bool) -> Self {
        self.track_total_hits = Some(enabled);
        self
    }

    /// Validate and split into target indices plus the request body.
    pub(crate) fn into_request(self) -> Result<(Vec<String>, Value), EsError> {
        let indices: Vec<String> = self
            .indices
            .into_iter()
            .filter(|index| !index.trim().is_empty())
            .collect();
        if indices.is_empty() {
            return Err(EsError::invalid("at least one index name is required"));
        }

        let mut body = Map::new();
        if let Some(query) = self.query {
            body.insert("query".to_string(), query);
        }
        if let Some(aggregations) = self.aggregations {
            body.insert("aggs".to_string(), aggregations);
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if let Some(sort) = self.sort {
            body.insert("sort".to_string(), sort);
        }
        if let Some(highlight) = self.highlight {
            body.insert("highlight".to_string(), highlight);
        }
        if let Some(track) = self.track_total_hits {
            body.insert("track_total_hits".to_string(), Value::from(track));
        }

        Ok((indices, Value::Object(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_body_from_set_pieces_only() {
        let input = SearchInput::new("articles")
            .query(json!({"match_all": {}}))
            .from(10)
            .size(25)
            .track_total_hits(true);

        let (indices, body) = input.into_request().unwrap();
        assert_eq!(indices, vec!["articles"]);
        assert_eq!(
            body,
            json!({
                "query": {"match_all": {}},
                "from": 10,
                "size": 25,
                "track_total_hits": true
            })
        );
    }

    #[test]
    fn empty_input_is_match_all() {
        let (_, body) = SearchInput::new("articles").into_request().unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn rejects_missing_indices() {
        let err = SearchInput::default().into_request().unwrap_err();
        assert!(matches!(err, EsError::InvalidArgument { .. }));

        let err = SearchInput::new("  ").into_request().unwrap_err();
        assert!(matches!(err, EsError::InvalidArgument { .. }));
    }

    #[test]
    fn supports_multiple_indices() {
        let (indices, _) = SearchInput::new("articles")
            .index("archive")
            .into_request()
            .unwrap();
        assert_eq!(indices, vec!["articles", "archive"]);
    }
}
