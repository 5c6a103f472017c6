//! Ports (interfaces) implemented by the infrastructure and presentation
//! layers.

pub mod board_api;
pub mod observer;
pub mod streaming;
