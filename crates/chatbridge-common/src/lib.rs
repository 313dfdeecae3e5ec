//! # Chatbridge Common
//!
//! Shared types, utilities, and common functionality for the chatbridge bot.
//!
//! This crate provides the foundational types, the tagged console logger and
//! the small text helpers used across all other crates in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{BridgeError, Result};
pub use logging::{init_logging, log_wrapped, report_error, LogTag, LoggingConfig};
pub use types::*;
pub use utils::*;
