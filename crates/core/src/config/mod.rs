//! Configuration loading and schema definitions
//!
//! The manifest (`twa-manifest.toml`) describes the wrapped site, the app
//! identity and the launcher shortcuts.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_CANDIDATES};
pub use schema::*;
