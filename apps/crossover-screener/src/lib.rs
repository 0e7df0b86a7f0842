// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Crossover Screener - Rust Core Library
//!
//! Batched, concurrent SMA crossover backtests over a ticker universe,
//! published as a ranked JSON snapshot that grows after every batch.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure types and calculations
//!   - `ticker`: Normalized symbols, universe de-duplication
//!   - `signal`: 50/200 SMA crossover against buy-and-hold
//!   - `snapshot`: Ranked results and run metadata
//!   - `batch`: Order-preserving batch partition
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `PriceSourcePort`, `SnapshotStorePort`, `TickerUniversePort`
//!   - `use_cases`: `EvaluateTicker` (fetch with retry, evaluate) and
//!     `RunBacktest` (the batch scheduler)
//!   - `services`: `RunTrigger`, single-flight background runs
//!
//! - **Infrastructure**: Adapters
//!   - `price_source`: Yahoo chart API, scripted mock
//!   - `persistence`: Atomic JSON file store, in-memory store
//!   - `universe`: Ticker file, static list
//!
//! - **Config / Observability**: YAML configuration, Prometheus metrics,
//!   tracing subscriber

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Hexagonal Layers
// =============================================================================

/// Domain layer - Core types and calculations with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Metrics and logging.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::{
    CrossoverMetrics, CrossoverParams, PriceSeries, RunMetadata, Snapshot, TickerResult,
    TickerSource, TickerSymbol, evaluate_crossover,
};

// Application re-exports
pub use application::dto::{RunRequest, RunSummary};
pub use application::ports::{PriceSourcePort, SnapshotStorePort, TickerUniversePort};
pub use application::services::{RunHandle, RunTrigger, TriggerError};
pub use application::use_cases::{
    EvaluateTickerUseCase, EvaluationFailure, RunBacktestUseCase, RunError, RunSettings,
};

// Infrastructure re-exports
pub use infrastructure::persistence::{InMemorySnapshotStore, JsonFileSnapshotStore};
pub use infrastructure::price_source::{MockPriceSource, YahooPriceSource};
pub use infrastructure::universe::{FileTickerUniverse, StaticTickerUniverse};
