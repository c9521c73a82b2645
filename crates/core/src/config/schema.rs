//! Configuration schema definitions
//!
//! Mirrors the sections of `twa-manifest.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration schema
///
/// `[app]` is required. Unknown keys are rejected in every section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    pub app: TwaManifest,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub shortcuts: Vec<ShortcutConfig>,
}

/// Identity and theming of the wrapping Android app
///
/// The [`Default`] value leaves `application_id` and `host_name` empty,
/// which fails validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwaManifest {
    /// Android application id (package name)
    pub application_id: String,

    /// Domain opened in the Trusted Web Activity
    pub host_name: String,

    /// Start path, relative to the domain
    #[serde(default = "default_launch_url")]
    pub launch_url: String,

    /// Name shown on the Android launcher
    #[serde(default = "default_name")]
    pub name: String,

    /// Status bar color
    #[serde(default = "default_theme_color")]
    pub theme_color: String,

    /// Navigation bar color
    #[serde(default = "default_navigation_color")]
    pub navigation_color: String,

    /// Splash screen background color
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Enable notification delegation
    #[serde(default)]
    pub enable_notifications: bool,

    /// Splash screen fade-out animation, in milliseconds
    #[serde(default = "default_splash_fade_out")]
    pub splash_screen_fade_out_duration: u32,
}

impl Default for TwaManifest {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            host_name: String::new(),
            launch_url: default_launch_url(),
            name: default_name(),
            theme_color: default_theme_color(),
            navigation_color: default_navigation_color(),
            background_color: default_background_color(),
            enable_notifications: false,
            splash_screen_fade_out_duration: default_splash_fade_out(),
        }
    }
}

impl TwaManifest {
    /// Full URL opened from the launcher icon
    pub fn launch_url(&self) -> String {
        format!("https://{}{}", self.host_name, self.launch_url)
    }

    /// Authority of the splash screen file provider
    pub fn provider_authority(&self) -> String {
        format!("{}.fileprovider", self.application_id)
    }
}

fn default_launch_url() -> String {
    "/".to_string()
}

fn default_name() -> String {
    "Example".to_string()
}

fn default_theme_color() -> String {
    "#FFFFFF".to_string()
}

fn default_navigation_color() -> String {
    "#FFFFFF".to_string()
}

fn default_background_color() -> String {
    "#FFFFFF".to_string()
}

fn default_splash_fade_out() -> u32 {
    300
}

/// Resource generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Exclusive upper bound on the number of shortcuts
    #[serde(default = "default_shortcut_ceiling")]
    pub shortcut_ceiling: usize,

    /// Android resource directory the generated files land in
    #[serde(default = "default_res_dir")]
    pub res_dir: String,

    /// File name of the generated values resource
    #[serde(default = "default_values_file")]
    pub values_file: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shortcut_ceiling: default_shortcut_ceiling(),
            res_dir: default_res_dir(),
            values_file: default_values_file(),
        }
    }
}

/// Last-observed launcher limit (at most 4 shortcuts), expected to evolve.
pub const DEFAULT_SHORTCUT_CEILING: usize = 5;

fn default_shortcut_ceiling() -> usize {
    DEFAULT_SHORTCUT_CEILING
}

fn default_res_dir() -> String {
    "app/src/main/res".to_string()
}

fn default_values_file() -> String {
    "twa_manifest.xml".to_string()
}

/// A launcher shortcut as written in the manifest
///
/// Fields are optional here so that a missing key is reported with the
/// shortcut index instead of failing the whole TOML parse.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ShortcutConfig {
    /// Label shown in the shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Label used when `name` is too long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    /// Path the app opens, relative to the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Drawable resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
