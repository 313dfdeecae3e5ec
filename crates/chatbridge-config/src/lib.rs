//! # Chatbridge Config
//!
//! Environment-driven configuration for the chatbridge bot.
//!
//! This crate loads `.env` files, checks the required variables, applies
//! defaults for the optional ones and validates the result before the bot
//! starts using it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validator;

pub use error::ConfigError;
pub use loader::*;
pub use schema::*;
