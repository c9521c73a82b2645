//! Pre-build resource generation
//!
//! Renders every generated resource in memory first, then writes them.
//! A validation failure therefore leaves the resource tree untouched.

use crate::manifest::validate_schema;
use crate::resources::generate_values;
use crate::shortcuts::ShortcutFileGenerator;
use crate::xml::XmlDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use twa_core::config::ConfigSchema;
use twa_core::error::{Error, ErrorCode, Result, ResultExt};

/// Location of the shortcuts document under the resource directory
pub const SHORTCUTS_PATH: &str = "xml/shortcuts.xml";

/// A rendered file and where it belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the resource directory
    pub relative_path: PathBuf,
    /// Rendered contents
    pub contents: XmlDocument,
}

/// What happened to a file on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file did not exist
    Created,
    /// The file existed with different contents
    Updated,
    /// The file already had these contents
    Unchanged,
}

/// Result of writing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Absolute or project-relative path written
    pub path: PathBuf,
    /// What happened
    pub status: WriteStatus,
}

/// Every file generated before the Gradle build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrebuildPlan {
    files: Vec<GeneratedFile>,
}

impl PrebuildPlan {
    /// Validate the manifest and render all resources
    pub fn render(schema: &ConfigSchema) -> Result<Self> {
        let validation = validate_schema(schema);
        for warning in validation.warnings() {
            warn!("{}", warning);
        }
        validation.to_result().with_suggestion("Run `twa-android check` for details")?;

        let generator = ShortcutFileGenerator::with_ceiling(schema.generator.shortcut_ceiling);
        let shortcuts = generator.validate(&schema.shortcuts)?;

        let shortcuts_doc =
            generator.generate(&shortcuts, &schema.app.application_id, &schema.app.host_name)?;
        let values_doc = generate_values(&schema.app, &shortcuts)?;

        Ok(Self {
            files: vec![
                GeneratedFile {
                    relative_path: PathBuf::from(SHORTCUTS_PATH),
                    contents: shortcuts_doc,
                },
                GeneratedFile {
                    relative_path: Path::new("values").join(&schema.generator.values_file),
                    contents: values_doc,
                },
            ],
        })
    }

    /// Rendered files
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// The rendered `shortcuts.xml`
    pub fn shortcuts(&self) -> &XmlDocument {
        &self.files[0].contents
    }

    /// The rendered values resource
    pub fn values(&self) -> &XmlDocument {
        &self.files[1].contents
    }

    /// Write all files under `res_dir`, skipping unchanged ones
    pub fn write(&self, res_dir: &Path) -> Result<Vec<WriteOutcome>> {
        let mut outcomes = Vec::with_capacity(self.files.len());

        for file in &self.files {
            let path = res_dir.join(&file.relative_path);
            let status = write_if_changed(&path, file.contents.as_str())
                .context(format!("Failed to write {}", path.display()))?;
            debug!("{}: {:?}", path.display(), status);
            outcomes.push(WriteOutcome { path, status });
        }

        let written = outcomes
            .iter()
            .filter(|o| o.status != WriteStatus::Unchanged)
            .count();
        info!("wrote {} of {} generated resource(s)", written, outcomes.len());

        Ok(outcomes)
    }

    /// Files under `res_dir` that are missing or differ from the plan
    pub fn stale(&self, res_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut stale = Vec::new();
        for file in &self.files {
            let path = res_dir.join(&file.relative_path);
            if read_existing(&path)?.as_deref() != Some(file.contents.as_str()) {
                stale.push(path);
            }
        }
        Ok(stale)
    }

    /// Fail when any generated file is out of date
    pub fn ensure_fresh(&self, res_dir: &Path) -> Result<()> {
        let stale = self.stale(res_dir)?;
        if stale.is_empty() {
            return Ok(());
        }
        let list: Vec<String> = stale.iter().map(|p| p.display().to_string()).collect();
        Err(Error::new(
            ErrorCode::StaleResources,
            format!("Generated resources are out of date: {}", list.join(", ")),
        )
        .with_suggestion("Run `twa-android prebuild`"))
    }
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::from(e)),
    }
}

fn write_if_changed(path: &Path, contents: &str) -> Result<WriteStatus> {
    let status = match read_existing(path)? {
        Some(existing) if existing == contents => return Ok(WriteStatus::Unchanged),
        Some(_) => WriteStatus::Updated,
        None => WriteStatus::Created,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    replace_file(path, contents)?;

    Ok(status)
}

/// Write next to the target and rename so a reader never sees half a file.
/// The temp file is removed if either step fails.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("xml.tmp");
    let written = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!("could not remove {}: {}", tmp.display(), cleanup);
        }
        return Err(Error::from(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use twa_core::config::ShortcutConfig;

    fn schema() -> ConfigSchema {
        toml::from_str(
            r##"
            [app]
            application_id = "com.example.app"
            host_name = "example.com"
            name = "Example"

            [[shortcuts]]
            name = "Create"
            short_name = "Create"
            url = "/create"
            icon = "ic_create"
            "##,
        )
        .unwrap()
    }

    #[test]
    fn test_render_plan() {
        let plan = PrebuildPlan::render(&schema()).unwrap();
        let paths: Vec<_> = plan.files().iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(
            paths,
            [PathBuf::from("xml/shortcuts.xml"), PathBuf::from("values/twa_manifest.xml")]
        );
        assert!(plan.shortcuts().as_str().contains("shortcut0"));
        assert!(plan.values().as_str().contains("shortcut_name_0"));
    }

    #[test]
    fn test_write_then_unchanged() {
        let dir = TempDir::new().unwrap();
        let plan = PrebuildPlan::render(&schema()).unwrap();

        let first = plan.write(dir.path()).unwrap();
        assert!(first.iter().all(|o| o.status == WriteStatus::Created));
        assert!(dir.path().join("xml/shortcuts.xml").is_file());
        assert!(!dir.path().join("xml/shortcuts.xml.tmp").exists());

        let second = plan.write(dir.path()).unwrap();
        assert!(second.iter().all(|o| o.status == WriteStatus::Unchanged));
        assert!(plan.stale(dir.path()).unwrap().is_empty());
        plan.ensure_fresh(dir.path()).unwrap();
    }

    #[test]
    fn test_updated_when_contents_differ() {
        let dir = TempDir::new().unwrap();
        let plan = PrebuildPlan::render(&schema()).unwrap();
        fs::create_dir_all(dir.path().join("xml")).unwrap();
        fs::write(dir.path().join("xml/shortcuts.xml"), "old").unwrap();

        let err = plan.ensure_fresh(dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::StaleResources);

        let outcomes = plan.write(dir.path()).unwrap();
        assert_eq!(outcomes[0].status, WriteStatus::Updated);
        assert_eq!(outcomes[1].status, WriteStatus::Created);
    }

    #[test]
    fn test_nothing_written_on_shortcut_error() {
        let dir = TempDir::new().unwrap();
        let mut schema = schema();
        schema.shortcuts.push(ShortcutConfig {
            name: Some("Broken".to_string()),
            ..ShortcutConfig::default()
        });

        let err = PrebuildPlan::render(&schema).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.message, "Missing `short_name` in shortcut #1");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_manifest_rejected() {
        let mut schema = schema();
        schema.app.host_name = "https://example.com".to_string();

        let err = PrebuildPlan::render(&schema).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("app.host_name"));
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("shortcuts.xml");
        fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(replace_file(&target, "<shortcuts />").is_err());
        assert!(!dir.path().join("shortcuts.xml.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_missing_app_identity_rejected() {
        let unnamed = ConfigSchema {
            shortcuts: schema().shortcuts,
            ..ConfigSchema::default()
        };

        let err = PrebuildPlan::render(&unnamed).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("app.application_id"));
        assert!(err.message.contains("app.host_name"));
    }

    #[test]
    fn test_custom_values_file() {
        let mut schema = schema();
        schema.generator.values_file = "generated.xml".to_string();
        let plan = PrebuildPlan::render(&schema).unwrap();
        assert_eq!(plan.files()[1].relative_path, PathBuf::from("values/generated.xml"));
    }
}
