//! The process launching capability and its shell backend.

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use texbuild_shared::{Platform, Result, TexBuildError};

/// Runs command lines produced by the assembler.
pub trait Launcher: Send + Sync {
    /// Run a command and wait for it. Returns its exit code (`None` if killed by a signal).
    fn run(&self, command: &str) -> impl Future<Output = Result<Option<i32>>> + Send;

    /// Start a command without waiting for it to finish.
    fn spawn(&self, command: &str) -> impl Future<Output = Result<()>> + Send;

    /// Run a command and return its standard output.
    fn capture(&self, command: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Hands whole command lines to the platform shell (`sh -c` or `cmd /C`).
#[derive(Debug, Clone, Copy)]
pub struct ShellLauncher {
    platform: Platform,
}

impl ShellLauncher {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn shell(&self, line: &str) -> Command {
        match self.platform {
            Platform::Unix => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(line);
                cmd
            }
            Platform::Windows => {
                let mut cmd = Command::new("cmd");
                // cmd.exe does its own quote parsing; hand it the wrapped line raw.
                #[cfg(windows)]
                cmd.raw_arg(cmd_line(line));
                #[cfg(not(windows))]
                cmd.arg(cmd_line(line));
                cmd
            }
        }
    }
}

/// Arguments for `cmd.exe`. With `/S` and one outer pair of quotes, cmd strips
/// exactly that pair, so a line like `"C:/Program Files/x.exe" "a.pdf"` survives.
fn cmd_line(line: &str) -> String {
    format!("/S /C \"{line}\"")
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl Launcher for ShellLauncher {
    async fn run(&self, command: &str) -> Result<Option<i32>> {
        debug!(command, "running");
        let status = self
            .shell(command)
            .status()
            .await
            .map_err(|e| TexBuildError::launch(command, e))?;
        Ok(status.code())
    }

    async fn spawn(&self, command: &str) -> Result<()> {
        debug!(command, "spawning detached");
        self.shell(command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| TexBuildError::launch(command, e))?;
        Ok(())
    }

    async fn capture(&self, command: &str) -> Result<String> {
        debug!(command, "capturing output");
        let output = self
            .shell(command)
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| TexBuildError::launch(command, e))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
