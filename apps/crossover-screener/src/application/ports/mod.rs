//! Application Ports (Driven)
//!
//! Ports define how the screener uses external systems. The infrastructure
//! layer provides the implementations.

mod price_source_port;
mod snapshot_store_port;
mod ticker_universe_port;

pub use price_source_port::{PriceSourceError, PriceSourcePort};
pub use snapshot_store_port::{SnapshotStorePort, StoreError};
pub use ticker_universe_port::{TickerUniversePort, UniverseError};

#[cfg(test)]
pub use price_source_port::MockPriceSourcePort;
#[cfg(test)]
pub use snapshot_store_port::MockSnapshotStorePort;
#[cfg(test)]
pub use ticker_universe_port::MockTickerUniversePort;
