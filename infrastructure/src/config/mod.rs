//! Configuration: file schema and multi-source loader.

pub mod file_config;
pub mod loader;
