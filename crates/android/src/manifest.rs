//! Manifest validation
//!
//! Checks the `[app]` and `[generator]` sections before anything is
//! generated. Every issue is collected so the user can fix them in one pass.

use crate::xml::is_xml_char;
use twa_core::config::{ConfigSchema, GeneratorConfig, TwaManifest};
use twa_core::validation::{ValidationResult, Validator};

/// Dotted Java package name with at least two segments
pub const APPLICATION_ID_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9_]*(\.[a-zA-Z][a-zA-Z0-9_]*)+$";

/// `#RGB`, `#RRGGBB` or `#AARRGGBB`
pub const COLOR_PATTERN: &str = r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";

/// Bare host name with an optional port
pub const HOST_NAME_PATTERN: &str =
    r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*(:[0-9]{1,5})?$";

/// Longest splash fade-out accepted, in milliseconds
pub const MAX_FADE_OUT_MS: u32 = 10_000;

const SLOW_FADE_OUT_MS: u32 = 2_000;
const LAUNCHER_LABEL_CHARS: usize = 30;

/// Validate the app identity section
pub fn validate_manifest(manifest: &TwaManifest) -> ValidationResult {
    let launch_url = manifest.launch_url.clone();

    Validator::new()
        .required("app.name", &manifest.name)
        .custom("app.name", || non_xml_message(&manifest.name))
        .warn_if(
            "app.name",
            manifest.name.chars().count() > LAUNCHER_LABEL_CHARS,
            "Long names are truncated on most launchers",
        )
        .pattern(
            "app.application_id",
            &manifest.application_id,
            APPLICATION_ID_PATTERN,
            "a package name such as com.example.app",
        )
        .pattern(
            "app.host_name",
            &manifest.host_name,
            HOST_NAME_PATTERN,
            "a bare host name such as example.com (no scheme or path)",
        )
        .custom("app.launch_url", move || {
            if !launch_url.starts_with('/') {
                Some(format!("Must start with '/', got {:?}", launch_url))
            } else {
                non_xml_message(&launch_url)
            }
        })
        .pattern("app.theme_color", &manifest.theme_color, COLOR_PATTERN, "a hex color")
        .pattern(
            "app.navigation_color",
            &manifest.navigation_color,
            COLOR_PATTERN,
            "a hex color",
        )
        .pattern(
            "app.background_color",
            &manifest.background_color,
            COLOR_PATTERN,
            "a hex color",
        )
        .range(
            "app.splash_screen_fade_out_duration",
            manifest.splash_screen_fade_out_duration,
            0,
            MAX_FADE_OUT_MS,
        )
        .warn_if(
            "app.splash_screen_fade_out_duration",
            manifest.splash_screen_fade_out_duration > SLOW_FADE_OUT_MS,
            "Fade-out longer than 2s delays the first paint of the site",
        )
        .validate()
}

fn non_xml_message(value: &str) -> Option<String> {
    value
        .chars()
        .find(|c| !is_xml_char(*c))
        .map(|c| format!("Contains the control character {:?}", c))
}

/// Validate the generator section
pub fn validate_generator(generator: &GeneratorConfig) -> ValidationResult {
    let values_file = generator.values_file.clone();

    Validator::new()
        .range("generator.shortcut_ceiling", generator.shortcut_ceiling, 1, usize::MAX)
        .required("generator.res_dir", &generator.res_dir)
        .custom("generator.values_file", move || {
            if values_file.contains(['/', '\\']) || !values_file.ends_with(".xml") {
                Some(format!("Must be a plain .xml file name, got {:?}", values_file))
            } else {
                None
            }
        })
        .validate()
}

/// Validate every non-shortcut section of the manifest
pub fn validate_schema(schema: &ConfigSchema) -> ValidationResult {
    let mut result = validate_manifest(&schema.app);
    result.merge(validate_generator(&schema.generator));
    result
}
