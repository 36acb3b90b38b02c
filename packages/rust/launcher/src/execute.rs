//! Runs an [`InvocationTriple`].
//!
//! Order: compile; if a bibliography command exists, run it and compile again;
//! then open the output. On Unix an already running viewer for the same file
//! is left alone, or sent `SIGHUP` when refreshing is enabled.

use serde::Serialize;
use tracing::{info, instrument, warn};

use texbuild_shared::{AppConfig, InvocationTriple, Platform, Result, TexBuildError};

use crate::launcher::Launcher;

/// Knobs for [`execute`].
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    pub platform: Platform,
    /// Refresh a running viewer instead of ignoring it (Unix only).
    pub refresh_viewer: bool,
}

impl From<&AppConfig> for ExecuteOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            platform: Platform::current(),
            refresh_viewer: config.viewer.refresh,
        }
    }
}

/// What happened to the viewer step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerAction {
    NotRequested,
    Launched,
    AlreadyRunning,
    Refreshed { pids: Vec<String> },
}

/// Summary of one [`execute`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    /// Number of engine passes that ran.
    pub compile_passes: u32,
    /// `Some(true)` if the bibliography engine succeeded, `None` if it was not run.
    pub bibliography_ok: Option<bool>,
    pub viewer: ViewerAction,
}

/// `ps ax | grep` command that finds a viewer already showing this output.
///
/// Built from the view command without its trailing viewer options, quotes
/// removed. The first character is bracketed so grep does not match itself.
pub fn viewer_probe_command(view: &str, viewer_options: &str) -> Option<String> {
    let target = view.strip_suffix(viewer_options).unwrap_or(view);
    let unquoted: String = target.chars().filter(|c| *c != '"').collect();
    let unquoted = unquoted.trim_end_matches(' ');

    let mut chars = unquoted.chars();
    let first = chars.next()?;
    Some(format!("ps ax | grep \"[{first}]{}\"", chars.as_str()))
}

async fn compile<L: Launcher>(launcher: &L, command: &str) -> Result<()> {
    let code = launcher.run(command).await?;
    if code != Some(0) {
        return Err(TexBuildError::CompileFailed {
            command: command.to_string(),
            code,
        });
    }
    Ok(())
}

async fn open_viewer<L: Launcher>(
    launcher: &L,
    triple: &InvocationTriple,
    view: &str,
    options: &ExecuteOptions,
) -> Result<ViewerAction> {
    if options.platform == Platform::Windows {
        launcher.spawn(view).await?;
        return Ok(ViewerAction::Launched);
    }

    let running = match viewer_probe_command(view, &triple.viewer_options) {
        Some(probe) => !launcher.capture(&probe).await?.trim().is_empty(),
        None => false,
    };

    if !running {
        launcher.run(view).await?;
        return Ok(ViewerAction::Launched);
    }

    if !options.refresh_viewer {
        info!(viewer = %triple.viewer, "viewer already open");
        return Ok(ViewerAction::AlreadyRunning);
    }

    let pids_out = launcher.capture(&format!("pidof {}", triple.viewer)).await?;
    let pids: Vec<String> = pids_out.split_whitespace().map(String::from).collect();
    for pid in &pids {
        launcher.run(&format!("kill -1 {pid}")).await?;
    }
    info!(viewer = %triple.viewer, count = pids.len(), "refreshed running viewer");
    Ok(ViewerAction::Refreshed { pids })
}

/// Run the commands in `triple` through `launcher`.
#[instrument(skip_all)]
pub async fn execute<L: Launcher>(
    triple: &InvocationTriple,
    launcher: &L,
    options: &ExecuteOptions,
) -> Result<ExecutionReport> {
    info!(command = triple.compile.as_deref().unwrap_or(""), "LaTeX compilation command");
    info!(command = triple.bibliography.as_deref().unwrap_or(""), "bibliography manager command");
    info!(command = triple.view.as_deref().unwrap_or(""), "open with command");

    let mut report = ExecutionReport {
        compile_passes: 0,
        bibliography_ok: None,
        viewer: ViewerAction::NotRequested,
    };

    if let Some(cmd) = &triple.compile {
        compile(launcher, cmd).await?;
        report.compile_passes += 1;
    }

    if let Some(bib) = &triple.bibliography {
        let ok = match launcher.run(bib).await {
            Ok(Some(0)) => true,
            Ok(code) => {
                warn!(?code, "bibliography manager call failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "bibliography manager call failed");
                false
            }
        };
        report.bibliography_ok = Some(ok);

        // second pass so references resolve
        if let Some(cmd) = &triple.compile {
            compile(launcher, cmd).await?;
            report.compile_passes += 1;
        }
    }

    if let Some(view) = &triple.view {
        report.viewer = open_viewer(launcher, triple, view, options).await?;
    }

    Ok(report)
}
