//! Output formatting and artifact writing.

pub mod artifacts;
pub mod console;
