//! Android resource generation for Trusted Web Activity wrappers
//!
//! This crate turns a `twa-manifest.toml` into the resource files the
//! Android build expects before resource compilation:
//! - `res/xml/shortcuts.xml` with the launcher shortcuts
//! - `res/values/twa_manifest.xml` with the app identity values
//!
//! It also wraps the Gradle tasks that run after generation.

#![warn(missing_docs)]

pub mod asset_links;
pub mod gradle;
pub mod manifest;
pub mod prebuild;
pub mod resources;
pub mod shortcuts;
pub mod xml;

pub use shortcuts::{ShortcutError, ShortcutField, ShortcutFileGenerator, ShortcutList, ShortcutSpec};
pub use xml::XmlDocument;
