//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Standard locations searched for the manifest, in order
pub const CONFIG_CANDIDATES: [&str; 3] = [
    "twa-manifest.toml",
    ".twa-manifest.toml",
    ".config/twa-manifest.toml",
];

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or from the first
    /// standard location under `base_dir` that exists.
    ///
    /// An explicit path that does not exist is an error. When nothing is
    /// found in the standard locations the defaults are used.
    pub fn load(path: Option<&Path>, base_dir: &Path) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(base_dir),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => {
                debug!("no manifest found under {}, using defaults", base_dir.display());
                ConfigSchema::default()
            }
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load configuration, failing when no manifest exists
    pub fn load_required(path: Option<&Path>, base_dir: &Path) -> Result<Self> {
        let config = Self::load(path, base_dir)?;
        if config.path.is_none() {
            return Err(Error::config_not_found(base_dir.join(CONFIG_CANDIDATES[0])));
        }
        Ok(config)
    }

    /// Directory the manifest lives in; relative paths resolve against it
    pub fn root_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(|p| {
                // `.config/twa-manifest.toml` belongs to the project one level up
                if p.file_name().is_some_and(|n| n == ".config") {
                    p.parent().unwrap_or(p).to_path_buf()
                } else {
                    p.to_path_buf()
                }
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolved resource directory
    pub fn res_dir(&self) -> PathBuf {
        self.res_dir_in(&self.root_dir())
    }

    /// Resource directory of the project rooted at `project_dir`
    pub fn res_dir_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.schema.generator.res_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file(base_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base_dir.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    debug!("loading manifest from {}", path.display());

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))?;

    Ok(schema)
}
