//! # TU Report Checker Common Library
//!
//! Shared code for the report checker crates:
//! - Error types
//! - Client configuration loading (CLI → ENV → TOML → defaults)

pub mod config;
pub mod error;

pub use config::{ClientConfig, ConfigOverrides, LoggingConfig};
pub use error::{Error, Result};
