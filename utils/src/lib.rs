//! Shared utilities for the burn verification service.

pub mod logging;

pub use logging::{init_logging, LogFormat};
