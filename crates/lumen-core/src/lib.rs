//! Lumen Core - Foundation crate for the Lumen accessibility audit tooling.
//!
//! This crate provides the shared error types and configuration management
//! that the browser and audit crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//!
//! # Example
//!
//! ```rust
//! use lumen_core::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.retries, 0);
//! assert_eq!(config.scanning.interval_ms, 1000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, EngineConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, LumenError, Result};
