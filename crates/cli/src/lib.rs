//! CLI utilities for Trusted Web Activity build tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Progress spinners for Gradle runs

#![warn(missing_docs)]

pub mod output;
pub mod progress;
