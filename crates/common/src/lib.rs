//! Cuesmith Common Utilities
//!
//! Shared infrastructure for all Cuesmith crates:
//! - Error types and result aliases
//! - Session clock and rate limiting for periodic work
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
