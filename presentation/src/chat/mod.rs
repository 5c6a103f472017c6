//! Interactive REPL.

pub mod repl;

pub use repl::CouncilRepl;
