//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (feed defaults, guide and overlay timings)
//! - The library `Config` and its validation
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel, Opt};
