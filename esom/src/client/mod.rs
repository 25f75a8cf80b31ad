//! Elasticsearch client facade.
//!
//! [`Es`] wraps the official protocol client with argument validation and
//! logging and wires the mapping compiler, identifier resolver and highlight
//! rewriter into its request/response paths. It adds no retries, backoff or
//! caching of its own; those belong to the transport underneath.

mod input;

pub use input::SearchInput;

use std::time::Duration;

use elasticsearch::auth::Credentials;
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts};
use elasticsearch::{BulkParts, DeleteByQueryParts, Elasticsearch, SearchParts};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::EsConfig;
use crate::errors::EsError;
use crate::highlight::apply_highlights;
use crate::identifier;
use crate::mapping::{self, TypeMapping};
use crate::registry;
use crate::response::SearchResponse;
use crate::types::{DocumentMetadata, EsDocument};

/// Handle over an Elasticsearch node.
#[derive(Clone)]
pub struct Es {
    client: Elasticsearch,
    config: EsConfig,
}

impl Es {
    /// Build a client from configuration (single-node connection pool,
    /// optional basic auth, per-request timeout).
    pub fn new(config: EsConfig) -> Result<Self, EsError> {
        let url: Url = config.url.parse().map_err(|err| {
            EsError::invalid(format!("invalid Elasticsearch URL `{}`: {}", config.url, err))
        })?;

        let pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        let transport = builder
            .build()
            .map_err(|err| EsError::invalid(format!("failed to build transport: {}", err)))?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            config,
        })
    }

    /// Wrap an existing protocol client.
    pub fn from_client(client: Elasticsearch, config: EsConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &EsConfig {
        &self.config
    }

    /// Create an index with the configured settings and no explicit mapping.
    pub async fn create_index(&self, index: &str) -> Result<bool, EsError> {
        let body = self.index_body(None)?;
        self.send_create_index(index, body).await
    }

    /// Create an index carrying a compiled mapping.
    pub async fn create_index_with_mapping(
        &self,
        index: &str,
        mapping: &TypeMapping,
    ) -> Result<bool, EsError> {
        let body = self.index_body(Some(mapping))?;
        self.send_create_index(index, body).await
    }

    /// Compile `T`'s mapping and create an index from it.
    pub async fn create_index_for<T: DocumentMetadata>(&self, index: &str) -> Result<bool, EsError> {
        let mapping = mapping::compile::<T>();
        self.create_index_with_mapping(index, &mapping).await
    }

    pub async fn delete_index(&self, index: &str) -> Result<bool, EsError> {
        ensure_index_name(index)?;
        debug!(index = %index, "deleting index");
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(log_transport)?;
        self.acknowledged(response).await
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool, EsError> {
        ensure_index_name(index)?;
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(log_transport)?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(rejected(response).await);
        }
        Ok(true)
    }

    /// Bulk-insert documents, reading each id from the `#[es(id)]` field.
    ///
    /// Fails before any network call when `T` declares no identifier field.
    /// Documents whose identifier value is unset are skipped with a warning.
    /// Returns `true` when no item in the batch failed; per-item failures
    /// are logged, not raised.
    pub async fn bulk_insert<T: EsDocument>(&self, index: &str, documents: &[T]) -> Result<bool, EsError> {
        self.bulk_insert_opts(index, documents, false).await
    }

    /// Bulk-insert with engine-assigned ids (no identifier field required).
    pub async fn bulk_insert_auto_id<T: EsDocument>(
        &self,
        index: &str,
        documents: &[T],
    ) -> Result<bool, EsError> {
        self.bulk_insert_opts(index, documents, true).await
    }

    pub async fn bulk_insert_opts<T: EsDocument>(
        &self,
        index: &str,
        documents: &[T],
        auto_id: bool,
    ) -> Result<bool, EsError> {
        ensure_index_name(index)?;
        if documents.is_empty() {
            warn!(index = %index, "bulk insert called with no documents");
            return Ok(false);
        }

        let operations = bulk_operations(documents, auto_id)?;
        if operations.is_empty() {
            warn!(index = %index, "bulk insert has no operations after filtering");
            return Ok(false);
        }

        let body: Vec<JsonBody<Value>> = operations.into_iter().map(Into::into).collect();
        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(log_transport)?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(rejected(response).await);
        }

        let body: Value = response.json().await.map_err(log_transport)?;
        let errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        if errors {
            let failed = body
                .get("items")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item.get("index").and_then(|op| op.get("error")).is_some())
                        .count() as u64
                })
                .unwrap_or(0);
            warn!(index = %index, failed, "bulk insert completed with item failures");
        } else {
            debug!(index = %index, "bulk insert completed");
        }
        Ok(!errors)
    }

    /// Search a single index with a raw query clause.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        query: Value,
    ) -> Result<SearchResponse<T>, EsError> {
        ensure_index_name(index)?;
        ensure_query(&query)?;
        self.search_input(SearchInput::new(index).query(query)).await
    }

    /// Paginated search with accurate total tracking.
    pub async fn search_paged<T: DeserializeOwned>(
        &self,
        index: &str,
        query: Value,
        from: Option<u64>,
        size: Option<u64>,
    ) -> Result<SearchResponse<T>, EsError> {
        ensure_index_name(index)?;
        ensure_query(&query)?;
        let mut input = SearchInput::new(index).query(query).track_total_hits(true);
        if let Some(from) = from {
            input = input.from(from);
        }
        if let Some(size) = size {
            input = input.size(size);
        }
        self.search_input(input).await
    }

    /// Search with full [`SearchInput`] parameters.
    pub async fn search_input<T: DeserializeOwned>(
        &self,
        input: SearchInput,
    ) -> Result<SearchResponse<T>, EsError> {
        let (indices, body) = input.into_request()?;
        let index_refs: Vec<&str> = indices.iter().map(String::as_str).collect();
        debug!(indices = ?indices, "searching");

        let response = self
            .client
            .search(SearchParts::Index(&index_refs))
            .body(body)
            .send()
            .await
            .map_err(log_transport)?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(rejected(response).await);
        }

        let parsed: SearchResponse<T> = response.json().await.map_err(log_transport)?;
        debug!(total = parsed.total(), "search completed");
        Ok(parsed)
    }

    /// Search, then rewrite hit sources with their highlight fragments.
    pub async fn search_highlighted<T: EsDocument>(
        &self,
        input: SearchInput,
    ) -> Result<SearchResponse<T>, EsError> {
        let mut response = self.search_input::<T>(input).await?;
        apply_highlights(&mut response);
        Ok(response)
    }

    /// Delete every document matching the query clause. Returns `true` when
    /// the engine reported no failures.
    pub async fn delete_by_query(&self, index: &str, query: Value) -> Result<bool, EsError> {
        ensure_index_name(index)?;
        ensure_query(&query)?;
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .body(json!({ "query": query }))
            .send()
            .await
            .map_err(log_transport)?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(rejected(response).await);
        }

        let body: Value = response.json().await.map_err(log_transport)?;
        let deleted = body.get("deleted").and_then(Value::as_u64).unwrap_or(0);
        let failures = body
            .get("failures")
            .and_then(Value::as_array)
            .map(|failures| failures.len() as u64)
            .unwrap_or(0);
        debug!(index = %index, deleted, failures, "delete by query completed");
        Ok(failures == 0)
    }

    /// Create an index (named after the lowercased type name) for every
    /// registered document type that does not have one yet.
    pub async fn ensure_indices(&self) -> Result<(), EsError> {
        for registration in registry::registered_documents() {
            let index = registration.type_name.to_lowercase();
            if self.index_exists(&index).await? {
                continue;
            }
            let mapping = mapping::compile_descriptor(
                (registration.descriptor)(),
                mapping::MappingPrecedence::default(),
            );
            self.create_index_with_mapping(&index, &mapping).await?;
            info!(index = %index, "created index for registered document type");
        }
        Ok(())
    }

    fn index_body(&self, mapping: Option<&TypeMapping>) -> Result<Value, EsError> {
        let mut body = json!({
            "settings": {
                "number_of_shards": self.config.index.number_of_shards,
                "index.max_result_window": self.config.index.max_result_window,
            }
        });
        if let Some(mapping) = mapping {
            body["mappings"] = serde_json::to_value(mapping)?;
        }
        Ok(body)
    }

    async fn send_create_index(&self, index: &str, body: Value) -> Result<bool, EsError> {
        ensure_index_name(index)?;
        debug!(index = %index, "creating index");
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(log_transport)?;
        self.acknowledged(response).await
    }

    async fn acknowledged(&self, response: Response) -> Result<bool, EsError> {
        let status = response.status_code();
        if !status.is_success() {
            return Err(rejected(response).await);
        }
        let body: Value = response.json().await.map_err(log_transport)?;
        Ok(body
            .get("acknowledged")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

/// Build the alternating action/source lines of a bulk request body.
///
/// With `auto_id` unset this resolves the identifier marker up front (so a
/// type without one fails before any document is serialized) and skips
/// documents whose identifier value is unset.
pub fn bulk_operations<T: EsDocument>(documents: &[T], auto_id: bool) -> Result<Vec<Value>, EsError> {
    if !auto_id {
        identifier::resolve_for::<T>()?;
    }

    let mut operations = Vec::with_capacity(documents.len() * 2);
    for document in documents {
        if auto_id {
            operations.push(json!({"index": {}}));
            operations.push(serde_json::to_value(document)?);
            continue;
        }

        let Some(id) = document.id_value() else {
            warn!(
                doc_type = T::descriptor().type_name,
                "document identifier is unset, skipping"
            );
            continue;
        };
        let id = match id {
            Value::String(id) => id,
            other => other.to_string(),
        };
        operations.push(json!({"index": {"_id": id}}));
        operations.push(serde_json::to_value(document)?);
    }
    Ok(operations)
}

fn ensure_index_name(index: &str) -> Result<(), EsError> {
    if index.trim().is_empty() {
        return Err(EsError::invalid("index name must not be empty"));
    }
    Ok(())
}

fn ensure_query(query: &Value) -> Result<(), EsError> {
    if query.is_null() {
        return Err(EsError::invalid("query must not be null"));
    }
    Ok(())
}

fn log_transport(err: elasticsearch::Error) -> EsError {
    error!(error = %err, "elasticsearch request failed");
    EsError::Transport(err)
}

async fn rejected(response: Response) -> EsError {
    let status = response.status_code().as_u16();
    let reason = response.text().await.unwrap_or_default();
    error!(status, reason = %reason, "elasticsearch rejected the request");
    EsError::Rejected { status, reason }
}
