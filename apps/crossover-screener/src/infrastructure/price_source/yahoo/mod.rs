//! Yahoo Finance Chart Adapter
//!
//! `PriceSourcePort` over the public v8 chart endpoint:
//! - Daily bars for an inclusive date window
//! - Split/dividend adjusted closes when the provider supplies them
//! - Rate limits surfaced with their `Retry-After` hint
//! - Optional extra CA certificate scoped to this client

mod adapter;
mod api_types;
mod error;

pub use adapter::YahooPriceSource;
pub use error::YahooError;
