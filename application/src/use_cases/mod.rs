//! Application use cases.

pub mod export_report;
pub mod run_deliberation;
pub mod run_execution;
mod shared;
