//! Launcher shortcuts (`res/xml/shortcuts.xml`) generation
//!
//! Shortcuts are the entries Android shows when the launcher icon is
//! long-pressed. Each one opens a path of the wrapped site through the
//! Trusted Web Activity launcher.
//!
//! # Example
//!
//! ```rust
//! use twa_android::shortcuts::{ShortcutFileGenerator, ShortcutList, ShortcutSpec};
//!
//! let shortcuts = ShortcutList::new(vec![ShortcutSpec::new("Create", "Create", "/create", "ic_create")]);
//! let doc = ShortcutFileGenerator::default()
//!     .generate(&shortcuts, "com.example.app", "example.com")
//!     .unwrap();
//!
//! assert!(doc.as_str().contains("android:data=\"https://example.com/create\""));
//! ```

use crate::xml::{is_xml_char, Element, XmlDocument, ANDROID_NS};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};
use twa_core::config::ShortcutConfig;
use twa_core::error::{Error as CoreError, ErrorCode};

pub use twa_core::config::DEFAULT_SHORTCUT_CEILING;

/// Activity that receives the shortcut intent and dispatches the URL
pub const LAUNCHER_ACTIVITY: &str = "com.google.androidbrowserhelper.trusted.LauncherActivity";

/// Intent action used by every shortcut
pub const ACTION_MAIN: &str = "android.intent.action.MAIN";

/// Category attached to every shortcut intent
pub const CATEGORY_LAUNCHER: &str = "android.intent.category.LAUNCHER";

/// Name of the string resource holding the label of shortcut `index`
pub fn name_resource(index: usize) -> String {
    format!("shortcut_name_{}", index)
}

/// Name of the string resource holding the short label of shortcut `index`
pub fn short_name_resource(index: usize) -> String {
    format!("shortcut_short_name_{}", index)
}

/// A required shortcut field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutField {
    /// Display label
    Name,
    /// Short display label
    ShortName,
    /// Path relative to the host
    Url,
    /// Drawable resource name
    Icon,
}

impl ShortcutField {
    /// All fields, in validation order
    pub const ALL: [ShortcutField; 4] = [
        ShortcutField::Name,
        ShortcutField::ShortName,
        ShortcutField::Url,
        ShortcutField::Icon,
    ];

    /// Key used in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            ShortcutField::Name => "name",
            ShortcutField::ShortName => "short_name",
            ShortcutField::Url => "url",
            ShortcutField::Icon => "icon",
        }
    }
}

impl fmt::Display for ShortcutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while validating shortcuts
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortcutError {
    /// More shortcuts than the launcher accepts
    #[error(
        "You can have at most {} shortcuts, found {count} (ceiling {ceiling})",
        .ceiling.saturating_sub(1)
    )]
    TooManyShortcuts {
        /// Number of shortcuts given
        count: usize,
        /// Exclusive upper bound
        ceiling: usize,
    },

    /// A required field is absent or empty
    #[error("Missing `{field}` in shortcut #{index}")]
    MissingField {
        /// Position of the shortcut
        index: usize,
        /// The first missing field
        field: ShortcutField,
    },

    /// A field holds a character XML cannot represent
    #[error("Invalid character in `{field}` of shortcut #{index}")]
    InvalidField {
        /// Position of the shortcut
        index: usize,
        /// The offending field
        field: ShortcutField,
    },

    /// The url is absolute or protocol-relative
    #[error("Invalid `url` in shortcut #{index}: {url:?} must be a path relative to the host")]
    InvalidUrl {
        /// Position of the shortcut
        index: usize,
        /// The rejected value
        url: String,
    },
}

impl ShortcutError {
    /// Error code for integration with `twa-core` error handling
    pub fn code(&self) -> ErrorCode {
        match self {
            ShortcutError::TooManyShortcuts { .. } => ErrorCode::TooManyShortcuts,
            ShortcutError::MissingField { .. } => ErrorCode::MissingField,
            ShortcutError::InvalidField { .. } => ErrorCode::InvalidField,
            ShortcutError::InvalidUrl { .. } => ErrorCode::InvalidUrl,
        }
    }
}

impl From<ShortcutError> for CoreError {
    fn from(err: ShortcutError) -> Self {
        let suggestion = match &err {
            ShortcutError::TooManyShortcuts { .. } => {
                "Remove entries from [[shortcuts]] or raise [generator] shortcut_ceiling".to_string()
            }
            ShortcutError::MissingField { index, field } => {
                format!("Add `{}` to [[shortcuts]] entry #{}", field, index)
            }
            ShortcutError::InvalidField { index, field } => {
                format!("Remove control characters from `{}` in [[shortcuts]] entry #{}", field, index)
            }
            ShortcutError::InvalidUrl { .. } => {
                "Use a path such as \"/create\"; the host comes from [app] host_name".to_string()
            }
        };
        CoreError::new(err.code(), err.to_string())
            .with_suggestion(suggestion)
            .with_source(err)
    }
}

/// One launcher shortcut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    /// Display label
    pub name: String,
    /// Label used when `name` does not fit
    pub short_name: String,
    /// Path opened on activation, relative to the host
    pub url: String,
    /// Drawable resource name
    pub icon: String,
}

impl ShortcutSpec {
    /// Create a shortcut
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        url: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    /// Value of a field
    pub fn field(&self, field: ShortcutField) -> &str {
        match field {
            ShortcutField::Name => &self.name,
            ShortcutField::ShortName => &self.short_name,
            ShortcutField::Url => &self.url,
            ShortcutField::Icon => &self.icon,
        }
    }
}

/// Ordered shortcuts; position determines the generated ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutList(Vec<ShortcutSpec>);

impl ShortcutList {
    /// Wrap shortcuts in display order
    pub fn new(shortcuts: Vec<ShortcutSpec>) -> Self {
        Self(shortcuts)
    }

    /// Number of shortcuts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no shortcuts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in display order
    pub fn iter(&self) -> std::slice::Iter<'_, ShortcutSpec> {
        self.0.iter()
    }

    /// Borrow as a slice
    pub fn as_slice(&self) -> &[ShortcutSpec] {
        &self.0
    }
}

impl From<Vec<ShortcutSpec>> for ShortcutList {
    fn from(shortcuts: Vec<ShortcutSpec>) -> Self {
        Self(shortcuts)
    }
}

impl<'a> IntoIterator for &'a ShortcutList {
    type Item = &'a ShortcutSpec;
    type IntoIter = std::slice::Iter<'a, ShortcutSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validates shortcuts and renders `shortcuts.xml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutFileGenerator {
    ceiling: usize,
}

impl Default for ShortcutFileGenerator {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_SHORTCUT_CEILING,
        }
    }
}

impl ShortcutFileGenerator {
    /// Generator accepting fewer than `ceiling` shortcuts
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self { ceiling }
    }

    /// Exclusive upper bound on the number of shortcuts
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Validate loosely-typed manifest entries into a [`ShortcutList`]
    ///
    /// Checks the count first, then each entry's fields in the order
    /// `name`, `short_name`, `url`, `icon`, stopping at the first problem.
    /// Values are trimmed.
    pub fn validate(&self, entries: &[ShortcutConfig]) -> Result<ShortcutList, ShortcutError> {
        self.check_count(entries.len())?;

        let mut shortcuts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let [name, short_name, url, icon] = check_fields(
                index,
                [
                    (ShortcutField::Name, entry.name.as_deref()),
                    (ShortcutField::ShortName, entry.short_name.as_deref()),
                    (ShortcutField::Url, entry.url.as_deref()),
                    (ShortcutField::Icon, entry.icon.as_deref()),
                ],
            )?;
            shortcuts.push(ShortcutSpec::new(name, short_name, url, icon));
        }

        Ok(ShortcutList::new(shortcuts))
    }

    /// Run every precondition of [`generate`](Self::generate)
    pub fn check(&self, shortcuts: &ShortcutList) -> Result<(), ShortcutError> {
        self.check_count(shortcuts.len())?;
        for (index, shortcut) in shortcuts.iter().enumerate() {
            check_fields(index, ShortcutField::ALL.map(|f| (f, Some(shortcut.field(f)))))?;
        }
        Ok(())
    }

    /// Render the shortcuts document
    ///
    /// All validation happens before anything is rendered, so an error
    /// never comes with partial output.
    pub fn generate(
        &self,
        shortcuts: &ShortcutList,
        application_id: &str,
        host_name: &str,
    ) -> Result<XmlDocument, ShortcutError> {
        self.check(shortcuts)?;

        let mut root = Element::new("shortcuts").attr("xmlns:android", ANDROID_NS);
        for (index, shortcut) in shortcuts.iter().enumerate() {
            debug!("shortcut{} -> {}", index, shortcut.url);
            root.push(shortcut_element(index, shortcut, application_id, host_name));
        }

        info!("generated {} launcher shortcut(s)", shortcuts.len());
        Ok(XmlDocument::from_root(&root))
    }

    fn check_count(&self, count: usize) -> Result<(), ShortcutError> {
        if count >= self.ceiling {
            return Err(ShortcutError::TooManyShortcuts {
                count,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }
}

/// Check one shortcut's fields in order and return them trimmed
fn check_fields<'a>(
    index: usize,
    fields: [(ShortcutField, Option<&'a str>); 4],
) -> Result<[&'a str; 4], ShortcutError> {
    let mut trimmed = [""; 4];
    for (slot, (field, value)) in trimmed.iter_mut().zip(fields) {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(ShortcutError::MissingField { index, field });
        }
        if !value.chars().all(is_xml_char) {
            return Err(ShortcutError::InvalidField { index, field });
        }
        if field == ShortcutField::Url && !is_relative_url(value) {
            return Err(ShortcutError::InvalidUrl {
                index,
                url: value.to_string(),
            });
        }
        *slot = value;
    }
    Ok(trimmed)
}

fn is_relative_url(url: &str) -> bool {
    !url.contains("://") && !url.starts_with("//") && !url.chars().any(char::is_whitespace)
}

/// Absolute URL a shortcut opens
pub fn shortcut_url(host_name: &str, url: &str) -> String {
    let url = url.trim();
    if url.starts_with(['/', '?', '#']) {
        format!("https://{}{}", host_name, url)
    } else {
        format!("https://{}/{}", host_name, url)
    }
}

fn shortcut_element(
    index: usize,
    shortcut: &ShortcutSpec,
    application_id: &str,
    host_name: &str,
) -> Element {
    let intent = Element::new("intent")
        .attr("android:action", ACTION_MAIN)
        .attr("android:targetPackage", application_id)
        .attr("android:targetClass", LAUNCHER_ACTIVITY)
        .attr("android:data", shortcut_url(host_name, &shortcut.url));

    let categories = Element::new("categories").attr("android:name", CATEGORY_LAUNCHER);

    Element::new("shortcut")
        .attr("android:shortcutId", format!("shortcut{}", index))
        .attr("android:enabled", "true")
        .attr("android:icon", format!("@drawable/{}", shortcut.icon.trim()))
        .attr(
            "android:shortcutShortLabel",
            format!("@string/{}", short_name_resource(index)),
        )
        .attr("android:shortcutLongLabel", format!("@string/{}", name_resource(index)))
        .child(intent)
        .child(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spec(tag: &str) -> ShortcutSpec {
        ShortcutSpec::new(tag, tag, format!("/{}", tag), format!("ic_{}", tag))
    }

    fn entry(name: Option<&str>, short_name: Option<&str>, url: Option<&str>, icon: Option<&str>) -> ShortcutConfig {
        ShortcutConfig {
            name: name.map(String::from),
            short_name: short_name.map(String::from),
            url: url.map(String::from),
            icon: icon.map(String::from),
        }
    }

    fn generate(shortcuts: Vec<ShortcutSpec>) -> Result<XmlDocument, ShortcutError> {
        ShortcutFileGenerator::default().generate(
            &ShortcutList::new(shortcuts),
            "com.example.app",
            "example.com",
        )
    }

    #[test]
    fn test_create_example() {
        let doc = generate(vec![ShortcutSpec::new("Create", "Create", "/create", "ic_create")]).unwrap();

        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<shortcuts xmlns:android="http://schemas.android.com/apk/res/android">
    <shortcut
        android:shortcutId="shortcut0"
        android:enabled="true"
        android:icon="@drawable/ic_create"
        android:shortcutShortLabel="@string/shortcut_short_name_0"
        android:shortcutLongLabel="@string/shortcut_name_0">
        <intent
            android:action="android.intent.action.MAIN"
            android:targetPackage="com.example.app"
            android:targetClass="com.google.androidbrowserhelper.trusted.LauncherActivity"
            android:data="https://example.com/create" />
        <categories android:name="android.intent.category.LAUNCHER" />
    </shortcut>
</shortcuts>
"#;
        assert_eq!(doc.as_str(), expected);
    }

    #[test]
    fn test_create_example_parses() {
        let doc = generate(vec![ShortcutSpec::new("Create", "Create", "/create", "ic_create")]).unwrap();
        let parsed = roxmltree::Document::parse(doc.as_str()).unwrap();

        let root = parsed.root_element();
        assert_eq!(root.tag_name().name(), "shortcuts");

        let shortcut = root.first_element_child().unwrap();
        assert_eq!(shortcut.attribute((ANDROID_NS, "shortcutId")), Some("shortcut0"));
        assert_eq!(shortcut.attribute((ANDROID_NS, "icon")), Some("@drawable/ic_create"));

        let children: Vec<_> = shortcut.children().filter(|n| n.is_element()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].tag_name().name(), "intent");
        assert_eq!(children[0].attribute((ANDROID_NS, "data")), Some("https://example.com/create"));
        assert_eq!(children[0].attribute((ANDROID_NS, "targetPackage")), Some("com.example.app"));
        assert_eq!(children[1].tag_name().name(), "categories");
    }

    #[test]
    fn test_empty_list() {
        let doc = generate(vec![]).unwrap();
        let parsed = roxmltree::Document::parse(doc.as_str()).unwrap();
        assert_eq!(parsed.root_element().tag_name().name(), "shortcuts");
        assert_eq!(parsed.root_element().children().filter(|n| n.is_element()).count(), 0);
        assert!(doc.as_str().ends_with('\n'));
    }

    #[test]
    fn test_too_many_shortcuts() {
        let err = generate((0..5).map(|i| spec(&format!("s{}", i))).collect()).unwrap_err();
        assert_eq!(err, ShortcutError::TooManyShortcuts { count: 5, ceiling: 5 });
        assert_eq!(err.to_string(), "You can have at most 4 shortcuts, found 5 (ceiling 5)");
    }

    #[test]
    fn test_count_checked_before_fields() {
        let entries = vec![ShortcutConfig::default(); 6];
        let err = ShortcutFileGenerator::default().validate(&entries).unwrap_err();
        assert_eq!(err, ShortcutError::TooManyShortcuts { count: 6, ceiling: 5 });
    }

    #[test]
    fn test_configurable_ceiling() {
        let shortcuts = ShortcutList::new((0..5).map(|i| spec(&format!("s{}", i))).collect());
        let doc = ShortcutFileGenerator::with_ceiling(6)
            .generate(&shortcuts, "com.example.app", "example.com")
            .unwrap();
        assert!(doc.as_str().contains("shortcut4"));

        let err = ShortcutFileGenerator::with_ceiling(2)
            .generate(&shortcuts, "com.example.app", "example.com")
            .unwrap_err();
        assert_eq!(err, ShortcutError::TooManyShortcuts { count: 5, ceiling: 2 });
    }

    #[test]
    fn test_missing_icon() {
        let err = generate(vec![ShortcutSpec::new("Create", "Create", "/create", "")]).unwrap_err();
        assert_eq!(err, ShortcutError::MissingField { index: 0, field: ShortcutField::Icon });
        assert_eq!(err.to_string(), "Missing `icon` in shortcut #0");
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let generator = ShortcutFileGenerator::default();

        let err = generator.validate(&[entry(None, None, None, None)]).unwrap_err();
        assert_eq!(err, ShortcutError::MissingField { index: 0, field: ShortcutField::Name });

        let err = generator.validate(&[entry(Some("a"), Some(" "), None, None)]).unwrap_err();
        assert_eq!(err, ShortcutError::MissingField { index: 0, field: ShortcutField::ShortName });

        let err = generator.validate(&[entry(Some("a"), Some("a"), None, Some("ic"))]).unwrap_err();
        assert_eq!(err, ShortcutError::MissingField { index: 0, field: ShortcutField::Url });
    }

    #[test]
    fn test_first_bad_entry_wins() {
        let entries = [
            entry(Some("a"), Some("a"), Some("/a"), Some("ic_a")),
            entry(Some("b"), Some("b"), Some("/b"), None),
            entry(None, None, None, None),
        ];
        let err = ShortcutFileGenerator::default().validate(&entries).unwrap_err();
        assert_eq!(err, ShortcutError::MissingField { index: 1, field: ShortcutField::Icon });
    }

    #[test]
    fn test_validate_builds_list() {
        let entries = [entry(Some("Create"), Some("New"), Some("/create"), Some("ic_create"))];
        let list = ShortcutFileGenerator::default().validate(&entries).unwrap();
        assert_eq!(list.as_slice(), &[ShortcutSpec::new("Create", "New", "/create", "ic_create")]);
    }

    #[test]
    fn test_rejects_control_characters() {
        for field in ShortcutField::ALL {
            let mut values = ["Create", "New", "/create", "ic_create"].map(String::from);
            values[field as usize].insert(1, '\u{1}');
            let [name, short_name, url, icon] = values;

            let err = generate(vec![ShortcutSpec::new(name.clone(), short_name.clone(), url.clone(), icon.clone())])
                .unwrap_err();
            assert_eq!(err, ShortcutError::InvalidField { index: 0, field });

            let entries = [entry(Some(name.as_str()), Some(short_name.as_str()), Some(url.as_str()), Some(icon.as_str()))];
            let err = ShortcutFileGenerator::default().validate(&entries).unwrap_err();
            assert_eq!(err, ShortcutError::InvalidField { index: 0, field });
        }
    }

    #[test]
    fn test_validate_trims_values() {
        let entries = [entry(Some("  Create "), Some("\tNew\n"), Some(" /create "), Some(" ic_create"))];
        let list = ShortcutFileGenerator::default().validate(&entries).unwrap();
        assert_eq!(list.as_slice(), &[ShortcutSpec::new("Create", "New", "/create", "ic_create")]);
    }

    #[test]
    fn test_rejects_absolute_urls() {
        for url in ["https://evil.example/x", "//evil.example/x", "/a b"] {
            let err = generate(vec![ShortcutSpec::new("a", "a", url, "ic")]).unwrap_err();
            assert_eq!(err, ShortcutError::InvalidUrl { index: 0, url: url.to_string() });
        }
    }

    #[test]
    fn test_shortcut_url_joining() {
        assert_eq!(shortcut_url("example.com", "/create"), "https://example.com/create");
        assert_eq!(shortcut_url("example.com", "create"), "https://example.com/create");
        assert_eq!(shortcut_url("example.com", "?source=shortcut"), "https://example.com?source=shortcut");
    }

    #[test]
    fn test_attribute_values_escaped() {
        let doc = generate(vec![ShortcutSpec::new("a", "a", "/search?q=a&b=\"c\"", "ic")]).unwrap();
        assert!(doc.as_str().contains("https://example.com/search?q=a&amp;b=&quot;c&quot;"));
        roxmltree::Document::parse(doc.as_str()).unwrap();
    }

    #[test]
    fn test_into_core_error() {
        let err: CoreError = ShortcutError::MissingField { index: 2, field: ShortcutField::Url }.into();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.message, "Missing `url` in shortcut #2");
        assert!(err.suggestion.unwrap().contains("#2"));

        let err: CoreError = ShortcutError::InvalidField { index: 0, field: ShortcutField::Icon }.into();
        assert_eq!(err.code, ErrorCode::InvalidField);
        assert_eq!(err.message, "Invalid character in `icon` of shortcut #0");
    }

    proptest! {
        #[test]
        fn prop_order_preserved_and_deterministic(tags in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
            let shortcuts: Vec<_> = tags.iter().map(|t| spec(t)).collect();
            let first = generate(shortcuts.clone()).unwrap();
            let second = generate(shortcuts).unwrap();
            prop_assert_eq!(&first, &second);

            let parsed = roxmltree::Document::parse(first.as_str()).unwrap();
            let elements: Vec<_> = parsed.root_element().children().filter(|n| n.is_element()).collect();
            prop_assert_eq!(elements.len(), tags.len());
            for (i, (el, tag)) in elements.iter().zip(&tags).enumerate() {
                let id = format!("shortcut{}", i);
                let icon = format!("@drawable/ic_{}", tag);
                prop_assert_eq!(el.attribute((ANDROID_NS, "shortcutId")), Some(id.as_str()));
                prop_assert_eq!(el.attribute((ANDROID_NS, "icon")), Some(icon.as_str()));
            }
        }
    }
}
