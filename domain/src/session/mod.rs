//! Streaming session domain: speakers, messages, and the fragment aggregator.

pub mod entities;
pub mod stream;
