//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated strategic question to pose to the board
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod query;
