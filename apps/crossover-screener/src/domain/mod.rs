//! Domain Layer
//!
//! Pure types and calculations for the crossover screener. Nothing in here
//! performs I/O or knows about the price source, the snapshot store, or the
//! async runtime.
//!
//! - `ticker`: normalized ticker symbols and universe de-duplication
//! - `price_series`: daily close history for one symbol
//! - `signal`: SMA crossover backtest against buy-and-hold
//! - `snapshot`: ranked results, run metadata, the persisted snapshot
//! - `batch`: order-preserving partition of a ticker list
//! - `window`: the date range covered by a run

pub mod batch;
pub mod errors;
pub mod price_series;
pub mod signal;
pub mod snapshot;
pub mod ticker;
pub mod window;

pub use batch::{BatchPlan, batch_count};
pub use errors::DomainError;
pub use price_series::{PricePoint, PriceSeries};
pub use signal::{CrossoverMetrics, CrossoverParams, evaluate_crossover};
pub use snapshot::{RunMetadata, Snapshot, TickerResult, TickerSource};
pub use ticker::{TickerSymbol, normalize_universe};
pub use window::RunWindow;
