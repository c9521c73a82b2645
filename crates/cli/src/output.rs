//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use twa_core::error::Error;
use twa_core::validation::ValidationResult;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Suppress success/info/step output; errors and warnings still print
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        if !is_quiet() {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        if !is_quiet() {
            println!("{} {}", "ℹ".blue(), message);
        }
    }

    /// Print a step message (for multi-step operations)
    pub fn step(step: usize, total: usize, message: &str) {
        if !is_quiet() {
            println!("{} {}", format!("[{}/{}]", step, total).dimmed(), message);
        }
    }

    /// Print a header
    pub fn header(message: &str) {
        if !is_quiet() {
            println!();
            println!("{}", message.bold());
            println!("{}", "─".repeat(message.chars().count()));
        }
    }
}

/// Print an error with its context and suggestion
pub fn print_error(err: &Error) {
    Status::error(&format!("{} {}", err.code.dimmed(), err.message));
    if let Some(context) = &err.context {
        eprintln!("  {} {}", "→".dimmed(), context);
    }
    if let Some(suggestion) = &err.suggestion {
        eprintln!("  {} {}", "help:".cyan(), suggestion);
    }
}

/// Print an error as a JSON report on stdout
pub fn print_error_json(err: &Error) {
    match serde_json::to_string_pretty(&err.to_report()) {
        Ok(json) => println!("{}", json),
        Err(_) => print_error(err),
    }
}

/// Print every error and warning of a validation pass
pub fn print_validation(result: &ValidationResult) {
    for error in result.errors() {
        Status::error(&error.to_string());
        if let Some(expected) = &error.expected {
            eprintln!("  {} expected {}", "→".dimmed(), expected);
        }
    }
    for warning in result.warnings() {
        Status::warning(&warning.to_string());
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
