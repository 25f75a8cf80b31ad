use serde::{Deserialize, Serialize};

/// Connection and index settings for the [`Es`](crate::client::Es) facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsConfig {
    /// Node URL (single-node connection pool).
    #[serde(default = "default_url")]
    pub url: String,

    /// Optional basic-auth credentials.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Settings attached to every index-create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    #[serde(default = "default_max_result_window")]
    pub max_result_window: u32,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_shards() -> u32 {
    1
}

fn default_max_result_window() -> u32 {
    1_000_000
}

impl Default for EsConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            request_timeout_ms: default_request_timeout_ms(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            number_of_shards: default_shards(),
            max_result_window: default_max_result_window(),
        }
    }
}
