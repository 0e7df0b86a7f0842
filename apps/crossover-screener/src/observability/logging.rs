//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured level (a bare level or
//! a full directive list) is used.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};

use crate::config::LoggingConfig;

/// Errors initializing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The level is not a valid filter directive.
    #[error("invalid log level '{level}': {source}")]
    InvalidLevel {
        /// Configured level.
        level: String,
        /// Parse error.
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let invalid = |source: ParseError| TracingError::InvalidLevel {
        level: config.level.clone(),
        source,
    };
    let mut filter = EnvFilter::try_new(&config.level).map_err(invalid)?;

    // A bare level also pins the crate's own target.
    if !config.level.contains([',', '=']) {
        let own: Directive = format!("crossover_screener={}", config.level)
            .parse()
            .map_err(invalid)?;
        filter = filter.add_directive(own);
    }

    Ok(filter)
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    result.map_err(|e| TracingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_level_builds_filter() {
        let config = LoggingConfig::default();
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn directive_lists_are_accepted() {
        let config = LoggingConfig {
            level: "warn,reqwest=error".to_string(),
            format: "json".to_string(),
        };
        assert!(env_filter(&config).is_ok());
    }
}
