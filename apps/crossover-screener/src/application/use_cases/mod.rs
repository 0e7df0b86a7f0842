//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod evaluate_ticker;
mod run_backtest;

pub use evaluate_ticker::{EvaluateTickerUseCase, EvaluationFailure, TickerOutcome};
pub use run_backtest::{RunBacktestUseCase, RunError, RunSettings};
