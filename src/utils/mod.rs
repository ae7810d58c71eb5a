//! Utility modules for common functionality
//!
//! Logging, progress reporting and settings shared by the library and the CLI.

pub mod logger;
pub mod progress;
pub mod config;
