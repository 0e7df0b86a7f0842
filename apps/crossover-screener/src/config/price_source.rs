//! Price source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP price source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSourceConfig {
    /// Chart API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra PEM CA certificate trusted by this client only.
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,
}

impl Default for PriceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            ca_cert_path: None,
        }
    }
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; crossover-screener/{})", env!("CARGO_PKG_VERSION"))
}
