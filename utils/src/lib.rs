//! Shared utilities for siteverify.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogFormatError};
