//! Generated `res/values` resources
//!
//! Holds the values the Android manifest and the TWA launcher read at run
//! time: names, URLs, colors, flags and the shortcut labels referenced from
//! `shortcuts.xml`.

use crate::asset_links::asset_statements;
use crate::shortcuts::{name_resource, short_name_resource, ShortcutList};
use crate::xml::{Element, XmlDocument};
use tracing::debug;
use twa_core::config::TwaManifest;
use twa_core::error::Result;

/// Kind of a values resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `<string>`
    String,
    /// `<color>`
    Color,
    /// `<bool>`
    Bool,
    /// `<integer>`
    Integer,
}

impl ResourceKind {
    /// XML tag of the resource
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::String => "string",
            ResourceKind::Color => "color",
            ResourceKind::Bool => "bool",
            ResourceKind::Integer => "integer",
        }
    }
}

/// One `name = value` resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Resource kind
    pub kind: ResourceKind,
    /// Resource name
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// Ordered set of generated values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceValues {
    entries: Vec<ResourceEntry>,
}

impl ResourceValues {
    /// Values derived from the manifest and shortcut labels
    pub fn from_manifest(manifest: &TwaManifest, shortcuts: &ShortcutList) -> Result<Self> {
        let launch_url = manifest.launch_url();
        let mut values = Self::default();

        values.push(ResourceKind::String, "appName", &manifest.name);
        values.push(ResourceKind::String, "launchUrl", &launch_url);
        // ChromeOS opens the same URL as a desktop PWA
        values.push(ResourceKind::String, "crosLaunchUrl", &launch_url);
        values.push(ResourceKind::String, "hostName", &manifest.host_name);
        values.push(
            ResourceKind::String,
            "assetStatements",
            &asset_statements(&manifest.host_name)?,
        );
        values.push(ResourceKind::Color, "colorPrimary", &manifest.theme_color);
        values.push(ResourceKind::Color, "navigationColor", &manifest.navigation_color);
        values.push(ResourceKind::Color, "backgroundColor", &manifest.background_color);
        values.push(
            ResourceKind::String,
            "providerAuthority",
            &manifest.provider_authority(),
        );
        values.push(
            ResourceKind::Bool,
            "enableNotification",
            if manifest.enable_notifications { "true" } else { "false" },
        );

        for (index, shortcut) in shortcuts.iter().enumerate() {
            values.push(ResourceKind::String, &name_resource(index), shortcut.name.trim());
            values.push(ResourceKind::String, &short_name_resource(index), shortcut.short_name.trim());
        }

        values.push(
            ResourceKind::Integer,
            "splashScreenFadeOutDuration",
            &manifest.splash_screen_fade_out_duration.to_string(),
        );

        debug!("collected {} resource values", values.entries.len());
        Ok(values)
    }

    fn push(&mut self, kind: ResourceKind, name: &str, value: &str) {
        self.entries.push(ResourceEntry {
            kind,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// All entries in output order
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Render the `<resources>` document
    pub fn to_document(&self) -> XmlDocument {
        let mut root = Element::new("resources");
        for entry in &self.entries {
            let value = match entry.kind {
                ResourceKind::String => escape_android_string(&entry.value),
                _ => entry.value.trim().to_string(),
            };
            root.push(
                Element::new(entry.kind.tag())
                    .attr("name", entry.name.as_str())
                    .text(value),
            );
        }
        XmlDocument::from_root(&root)
    }
}

/// Render the values document for a manifest
pub fn generate_values(manifest: &TwaManifest, shortcuts: &ShortcutList) -> Result<XmlDocument> {
    Ok(ResourceValues::from_manifest(manifest, shortcuts)?.to_document())
}

/// Escape a value for an Android string resource
///
/// aapt strips unescaped quotes and treats a leading `@` or `?` as a
/// reference, so these are backslash-escaped. XML escaping happens later.
pub fn escape_android_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    if value.starts_with(['@', '?']) {
        escaped.push('\\');
    }
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}
