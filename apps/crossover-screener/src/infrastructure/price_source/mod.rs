//! Price Source Adapters
//!
//! Implementations of `PriceSourcePort`.

pub mod mock;
pub mod yahoo;

pub use mock::MockPriceSource;
pub use yahoo::{YahooError, YahooPriceSource};
