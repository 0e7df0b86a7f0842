//! Data Transfer Objects (DTOs)
//!
//! Inputs and outputs of a screener run at the trigger boundary.

mod run_dto;

pub use run_dto::{RunRequest, RunSummary, TickerFailure};
