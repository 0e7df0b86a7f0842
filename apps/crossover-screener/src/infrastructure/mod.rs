//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `price_source/`: Yahoo chart API client and a scripted mock source
//! - `persistence/`: atomic JSON file snapshot store and an in-memory store
//! - `universe/`: file-backed and static ticker universes

pub mod persistence;
pub mod price_source;
pub mod universe;
