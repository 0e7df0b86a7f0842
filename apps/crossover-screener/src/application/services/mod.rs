//! Application Services
//!
//! Application services coordinate use cases for long-running callers.
//! They differ from use cases in that they own background tasks.

mod run_trigger;

pub use run_trigger::{RunHandle, RunTrigger, TriggerError};
