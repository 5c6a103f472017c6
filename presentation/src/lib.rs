//! Presentation layer for council
//!
//! This crate contains the CLI definition, console output formatters,
//! the live transcript reporter, and the interactive REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::CouncilRepl;
pub use cli::commands::Cli;
pub use output::artifacts::{save_diagram, save_report};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::TranscriptReporter;
