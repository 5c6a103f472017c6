//! Live session progress reporting.

pub mod reporter;
