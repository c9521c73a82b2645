//! Core utilities for Trusted Web Activity build tools
//!
//! This crate provides the shared plumbing under the generators:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: `twa-manifest.toml` discovery and schema
//! - **Validation**: a fluent validator that collects every issue
//! - **Process execution**: running the Gradle wrapper
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use twa_core::config::Config;
//!
//! let config = Config::load(None, Path::new(".")).expect("invalid manifest");
//! println!("Wrapping https://{}", config.schema.app.host_name);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

