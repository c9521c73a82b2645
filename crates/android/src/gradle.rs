//! Gradle build system integration
//!
//! Provides wrappers for the Gradle tasks run after resource generation.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use twa_core::error::{Error, ErrorCode, Result};
use twa_core::process::{command_exists, run_command_in_dir, run_command_streaming_in_dir, CommandResult};

/// Build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    /// Debuggable, signed with the debug key
    Debug,
    /// Minified release build
    Release,
}

impl FromStr for BuildVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildVariant::Debug),
            "release" => Ok(BuildVariant::Release),
            other => Err(Error::new(
                ErrorCode::ConfigError,
                format!("Unknown build configuration: {}", other),
            )
            .with_suggestion("Use debug or release")),
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildVariant::Debug => f.write_str("debug"),
            BuildVariant::Release => f.write_str("release"),
        }
    }
}

/// Build output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Installable APK
    Apk,
    /// Play Store bundle (AAB)
    Bundle,
}

/// Gradle task producing `artifact` for `variant`
pub fn task_name(variant: BuildVariant, artifact: Artifact) -> &'static str {
    match (artifact, variant) {
        (Artifact::Apk, BuildVariant::Debug) => "assembleDebug",
        (Artifact::Apk, BuildVariant::Release) => "assembleRelease",
        (Artifact::Bundle, BuildVariant::Debug) => "bundleDebug",
        (Artifact::Bundle, BuildVariant::Release) => "bundleRelease",
    }
}

/// Gradle executable for a project: its wrapper, else `gradle` on PATH
pub fn gradle_command(project_dir: &Path) -> Result<String> {
    let wrapper = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };

    if project_dir.join(wrapper).is_file() {
        let command = if cfg!(windows) {
            wrapper.to_string()
        } else {
            format!("./{}", wrapper)
        };
        return Ok(command);
    }

    if command_exists("gradle") {
        return Ok("gradle".to_string());
    }

    Err(Error::command_not_found("gradle")
        .with_context(format!("No {} in {}", wrapper, project_dir.display())))
}

/// Run a Gradle task with captured output
pub fn run_task(project_dir: &Path, task: &str) -> Result<CommandResult> {
    let gradle = gradle_command(project_dir)?;
    run_command_in_dir(&gradle, &[task], project_dir)
}

/// Run a Gradle task with output streamed to the terminal
pub fn run_task_streaming(project_dir: &Path, task: &str) -> Result<()> {
    let gradle = gradle_command(project_dir)?;
    let code = run_command_streaming_in_dir(&gradle, &[task], project_dir)?;
    if code != 0 {
        return Err(Error::new(
            ErrorCode::GradleError,
            format!("gradle {} exited with code {}", task, code),
        ));
    }
    Ok(())
}
