//! Ticker Universe Adapters
//!
//! Implementations of `TickerUniversePort`.

pub mod file;
pub mod static_list;

pub use file::FileTickerUniverse;
pub use static_list::StaticTickerUniverse;
