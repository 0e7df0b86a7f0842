//! Application Layer
//!
//! Ports, the retry policy, and the use cases that drive a screener run.
//!
//! - `dto`: run requests and summaries
//! - `ports`: interfaces for the price source, snapshot store and ticker universe
//! - `retry`: linear backoff shared by fetches and snapshot writes
//! - `use_cases`: single-ticker fetch-and-evaluate and the batch scheduler
//! - `services`: the single-flight run trigger

pub mod dto;
pub mod ports;
pub mod retry;
pub mod services;
pub mod use_cases;
