//! Operator console for the tiered cache.
//!
//! A line-oriented front end that maps operator commands onto a single
//! [`tiered_cache::MultiLevelCache`] and prints the results.

pub mod banner;
pub mod command;
pub mod config;
pub mod logging;
pub mod session;

pub use command::{Command, ConsoleError};
pub use config::{Config, ConfigError};
