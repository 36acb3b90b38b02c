//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use texbuild_core::{BuildOutcome, resolve_build};
use texbuild_launcher::{ExecuteOptions, ShellLauncher, ViewerAction, execute};
use texbuild_shared::{
    AppConfig, BuildConfig, InvocationTriple, config_file_path, init_config,
    legacy_config_file_path, load_config, load_config_from, normalize_separators,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// TeXbuild: compile a LaTeX document the way its first line asks.
#[derive(Parser)]
#[command(
    name = "texbuild",
    version,
    about = "Build LaTeX documents from first-line directives: engine, bibliography, viewer, master file.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.texbuild/texbuild.toml (.txt for legacy format).
    #[arg(long, global = true, env = "TEXBUILD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Resolve a document and run its compile, bibliography and view commands.
    Build {
        /// Directory containing the document.
        directory: String,

        /// Document file name, e.g. main.tex.
        file: String,

        /// Print the commands without running them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the resolved plan and commands for a document.
    Plan {
        /// Directory containing the document.
        directory: String,

        /// Document file name.
        file: String,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "texbuild=info",
        1 => "texbuild=debug",
        _ => "texbuild=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "This is TeXbuild");

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build {
            directory,
            file,
            dry_run,
        } => cmd_build(config_path, &directory, &file, dry_run).await,
        Command::Plan {
            directory,
            file,
            json,
        } => cmd_plan(config_path, &directory, &file, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// The file `app_config` reads: the `--config` path, else `texbuild.toml`, else a
/// legacy `config.txt`. Falls back to the TOML path when neither exists.
fn config_source(path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = path {
        return Ok(p.to_path_buf());
    }
    let toml_path = config_file_path()?;
    let legacy = legacy_config_file_path()?;
    if !toml_path.exists() && legacy.exists() {
        return Ok(legacy);
    }
    Ok(toml_path)
}

/// Normalize separators and anchor a relative directory at the working directory.
fn document_dir(directory: &str) -> Result<PathBuf> {
    let normalized = PathBuf::from(normalize_separators(directory));
    std::path::absolute(&normalized)
        .map_err(|e| eyre!("cannot resolve directory '{directory}': {e}"))
}

fn resolve(config: &AppConfig, directory: &str, file: &str) -> Result<BuildOutcome> {
    let dir = document_dir(directory)?;
    let build_config = BuildConfig::from(config);
    Ok(resolve_build(&dir, file, &build_config)?)
}

fn print_commands(triple: &InvocationTriple) {
    println!();
    println!("LaTeX compilation command:");
    println!("{}\n", triple.compile.as_deref().unwrap_or(""));
    println!("Bibliography manager command:");
    println!("{}\n", triple.bibliography.as_deref().unwrap_or(""));
    println!("Open with command:");
    println!("{}\n", triple.view.as_deref().unwrap_or(""));
}

async fn cmd_build(
    config_path: Option<&Path>,
    directory: &str,
    file: &str,
    dry_run: bool,
) -> Result<()> {
    let config = app_config(config_path)?;
    let outcome = resolve(&config, directory, file)?;

    info!(
        document = %outcome.plan.document.display(),
        redirects = outcome.visited.len() - 1,
        "resolved build plan"
    );
    print_commands(&outcome.triple);

    if dry_run {
        return Ok(());
    }

    let options = ExecuteOptions::from(&config);
    let launcher = ShellLauncher::new(options.platform);
    let report = execute(&outcome.triple, &launcher, &options).await?;

    println!("  Compile passes: {}", report.compile_passes);
    match report.bibliography_ok {
        Some(true) => println!("  Bibliography:   ok"),
        Some(false) => println!("  Bibliography:   failed"),
        None => {}
    }
    match report.viewer {
        ViewerAction::NotRequested => {}
        ViewerAction::Launched => println!("  Viewer:         launched"),
        ViewerAction::AlreadyRunning => println!("  Viewer:         already open"),
        ViewerAction::Refreshed { pids } => {
            println!("  Viewer:         refreshed ({} processes)", pids.len())
        }
    }

    Ok(())
}

async fn cmd_plan(
    config_path: Option<&Path>,
    directory: &str,
    file: &str,
    json: bool,
) -> Result<()> {
    let config = app_config(config_path)?;
    let outcome = resolve(&config, directory, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let plan = &outcome.plan;
    println!();
    println!("  Document: {}", plan.document.display());
    for path in outcome.visited.iter().take(outcome.visited.len() - 1) {
        println!("  Via:      {}", path.display());
    }
    for key in texbuild_shared::SpecifierKey::ALL {
        println!("  {:<11} {}", key.as_str(), plan.specifiers.get(key));
    }
    for diag in &outcome.diagnostics {
        println!("  warning:  {diag}");
    }
    print_commands(&outcome.triple);

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = app_config(config_path)?;
    let source = config_source(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    if source.exists() {
        println!("# {}", source.display());
    } else {
        println!("# {} not found, showing defaults", source.display());
    }
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_takes_directory_and_file() {
        let cli = Cli::try_parse_from(["texbuild", "build", "/docs", "main.tex", "--dry-run"])
            .expect("parse");
        match cli.command {
            Command::Build {
                directory,
                file,
                dry_run,
            } => {
                assert_eq!(directory, "/docs");
                assert_eq!(file, "main.tex");
                assert!(dry_run);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn config_source_prefers_explicit_path() {
        let explicit = Path::new("/etc/texbuild/custom.toml");
        assert_eq!(config_source(Some(explicit)).expect("source"), explicit);
        let default = config_source(None).expect("default source");
        assert!(
            default == config_file_path().expect("config path")
                || default == legacy_config_file_path().expect("legacy path")
        );
    }

    #[test]
    fn relative_directory_becomes_absolute() {
        let dir = document_dir(r"thesis\chapters").expect("absolute");
        assert!(dir.is_absolute());
        assert!(dir.ends_with("thesis/chapters"));
    }
}
