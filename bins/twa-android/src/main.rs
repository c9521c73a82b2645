//! TWA Android CLI
//!
//! Generates the Android resources of a Trusted Web Activity wrapper from
//! `twa-manifest.toml` and runs the Gradle build after them.

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use twa_android::gradle::{self, Artifact, BuildVariant};
use twa_android::manifest::validate_schema;
use twa_android::prebuild::{PrebuildPlan, WriteStatus};
use twa_android::ShortcutFileGenerator;
use twa_cli::output::{self, format_count, Status};
use twa_cli::progress;
use twa_core::config::{Config, CONFIG_CANDIDATES};
use twa_core::error::{exit_codes, Error, ErrorCode, Result};

const STARTER_MANIFEST: &str = include_str!("../templates/twa-manifest.toml");

#[derive(Parser)]
#[command(name = "twa-android")]
#[command(about = "Generate Android resources for a Trusted Web Activity")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Report errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or write res/xml/shortcuts.xml
    Shortcuts {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print or write the generated res/values resource
    Resources {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write every generated resource into the resource directory
    Prebuild {
        /// Resource directory (defaults to [generator] res_dir)
        #[arg(long)]
        res_dir: Option<PathBuf>,
        /// Fail if generated files are stale instead of writing them
        #[arg(long)]
        check: bool,
    },

    /// Validate the manifest and shortcuts
    Check,

    /// Generate resources, then run Gradle
    Build {
        /// Build configuration: debug, release
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Android project directory; resources are generated under it (defaults to the manifest's directory)
        #[arg(long)]
        project_dir: Option<PathBuf>,
    },

    /// Write a starter twa-manifest.toml
    Init {
        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    output::set_quiet(cli.quiet);
    init_tracing(cli.verbose, cli.quiet).context("failed to initialize logging")?;

    let result = match cli.command {
        Commands::Shortcuts { out } => run_shortcuts(cli.config.as_deref(), out.as_deref()),
        Commands::Resources { out } => run_resources(cli.config.as_deref(), out.as_deref()),
        Commands::Prebuild { res_dir, check } => {
            run_prebuild(cli.config.as_deref(), res_dir.as_deref(), check)
        }
        Commands::Check => run_check(cli.config.as_deref()),
        Commands::Build {
            configuration,
            bundle,
            clean,
            project_dir,
        } => run_build(
            cli.config.as_deref(),
            &configuration,
            bundle,
            clean,
            project_dir.as_deref(),
            cli.verbose > 0,
        ),
        Commands::Init { force } => run_init(cli.config.as_deref(), force),
    };

    let exit_code = match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            if cli.json {
                output::print_error_json(&err);
            } else {
                output::print_error(&err);
            }
            err.code.exit_code()
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,twa_core={level},twa_android={level},twa_android_cli={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load_required(path, Path::new("."))?;
    debug!("using manifest {:?}", config.path);
    Ok(config)
}

fn emit(document: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, document)?;
            Status::success(&format!("Wrote {}", path.display()));
        }
        None => print!("{}", document),
    }
    Ok(())
}

fn run_shortcuts(config: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let plan = PrebuildPlan::render(&config.schema)?;
    emit(plan.shortcuts().as_str(), out)
}

fn run_resources(config: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let plan = PrebuildPlan::render(&config.schema)?;
    emit(plan.values().as_str(), out)
}

fn run_prebuild(config: Option<&Path>, res_dir: Option<&Path>, check: bool) -> Result<()> {
    let config = load_config(config)?;
    let res_dir = res_dir.map(Path::to_path_buf).unwrap_or_else(|| config.res_dir());
    let plan = PrebuildPlan::render(&config.schema)?;

    if check {
        plan.ensure_fresh(&res_dir)?;
        Status::success("Generated resources are up to date");
        return Ok(());
    }

    for outcome in plan.write(&res_dir)? {
        let label = match outcome.status {
            WriteStatus::Created => "created".green().to_string(),
            WriteStatus::Updated => "updated".yellow().to_string(),
            WriteStatus::Unchanged => "unchanged".dimmed().to_string(),
        };
        Status::info(&format!("{} {}", outcome.path.display(), label));
    }

    Status::success(&format!(
        "Generated resources for {} ({})",
        config.schema.app.application_id,
        format_count(config.schema.shortcuts.len(), "shortcut", "shortcuts")
    ));
    Ok(())
}

fn run_check(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let schema = &config.schema;

    Status::header("Manifest");
    let validation = validate_schema(schema);
    output::print_validation(&validation);
    let manifest_ok = validation.is_valid();
    if manifest_ok {
        Status::success(&format!(
            "{} -> https://{}{}",
            schema.app.application_id, schema.app.host_name, schema.app.launch_url
        ));
    }

    Status::header("Shortcuts");
    let generator = ShortcutFileGenerator::with_ceiling(schema.generator.shortcut_ceiling);
    let shortcuts = generator.validate(&schema.shortcuts)?;
    for (index, shortcut) in shortcuts.iter().enumerate() {
        Status::info(&format!("#{} {} -> {}", index, shortcut.name, shortcut.url));
    }
    Status::success(&format_count(shortcuts.len(), "shortcut", "shortcuts"));

    if !manifest_ok {
        return validation.to_result();
    }
    Ok(())
}

fn run_build(
    config: Option<&Path>,
    configuration: &str,
    bundle: bool,
    clean: bool,
    project_dir: Option<&Path>,
    stream: bool,
) -> Result<()> {
    let variant: BuildVariant = configuration.parse()?;
    let artifact = if bundle { Artifact::Bundle } else { Artifact::Apk };
    let total = if clean { 3 } else { 2 };
    let mut step = 1;

    let config = load_config(config)?;
    let project_dir = project_dir.map(Path::to_path_buf).unwrap_or_else(|| config.root_dir());

    Status::step(step, total, "Generating resources");
    PrebuildPlan::render(&config.schema)?.write(&config.res_dir_in(&project_dir))?;

    if clean {
        step += 1;
        Status::step(step, total, "Cleaning");
        run_gradle(&project_dir, "clean", stream)?;
    }

    step += 1;
    let task = gradle::task_name(variant, artifact);
    Status::step(step, total, &format!("Building {} {}", variant, if bundle { "bundle" } else { "APK" }));
    run_gradle(&project_dir, task, stream)?;

    Status::success("Build succeeded");
    Ok(())
}

fn run_gradle(project_dir: &Path, task: &str, stream: bool) -> Result<()> {
    if stream {
        return gradle::run_task_streaming(project_dir, task);
    }

    let pb = progress::spinner(&format!("gradle {}", task));
    let result = match gradle::run_task(project_dir, task) {
        Ok(result) => result,
        Err(e) => {
            progress::finish_error(&pb, &format!("gradle {}", task));
            return Err(e);
        }
    };

    if result.success {
        progress::finish_success(&pb, &format!("gradle {}", task));
        Ok(())
    } else {
        progress::finish_error(&pb, &format!("gradle {}", task));
        eprintln!("{}", result.combined_output());
        Err(Error::new(
            ErrorCode::GradleError,
            format!("gradle {} exited with code {}", task, result.exit_code),
        ))
    }
}

fn run_init(config: Option<&Path>, force: bool) -> Result<()> {
    let path = config
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_CANDIDATES[0]));

    if path.exists() && !force {
        return Err(Error::already_exists(&path));
    }

    std::fs::write(&path, STARTER_MANIFEST)?;
    Status::success(&format!("Wrote {}", path.display()));
    Status::info("Edit [app] and add [[shortcuts]], then run `twa-android prebuild`");
    Ok(())
}
