//! Domain layer for council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation and Execution
//!
//! A council run has two server-orchestrated streaming phases:
//!
//! - **Deliberation**: a board of AI personas debates the question and
//!   converges on a recommendation (the [`BoardResult`]).
//! - **Execution**: an optional second phase where an execution squad acts
//!   on the board's final verdict.
//!
//! ## Transcript
//!
//! Both phases arrive as arbitrarily-chunked text fragments tagged by
//! speaker. The [`Transcript`] folds those fragments into ordered,
//! per-speaker messages (run-length encoded by speaker).

pub mod board;
pub mod core;
pub mod session;

// Re-export commonly used types
pub use board::entities::{BoardResult, DecisionDiagram, StrategicOption};
pub use crate::core::{error::DomainError, query::Query};
pub use session::{
    entities::{Message, Phase, Session, SessionStatus, Speaker},
    stream::{StreamEvent, Transcript},
};
