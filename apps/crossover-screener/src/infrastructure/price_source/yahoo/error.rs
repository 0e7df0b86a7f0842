//! Yahoo adapter construction errors.

use thiserror::Error;

/// Errors building the Yahoo client.
#[derive(Debug, Error)]
pub enum YahooError {
    /// Base URL is not a valid absolute URL.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The configured URL.
        url: String,
        /// Parse error details.
        message: String,
    },

    /// CA certificate could not be loaded.
    #[error("Failed to load CA certificate '{path}': {message}")]
    CaCertificate {
        /// Certificate path.
        path: String,
        /// Error details.
        message: String,
    },

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}
