//! HTTP board API adapter.

pub mod client;
