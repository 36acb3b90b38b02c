//! Process launching for TeXbuild.
//!
//! The core only builds command lines. This crate runs them: compile, then
//! bibliography plus a second compile, then the viewer, with the
//! platform-specific viewer handling the original tool relied on.

pub mod execute;
pub mod launcher;

pub use execute::{ExecuteOptions, ExecutionReport, ViewerAction, execute, viewer_probe_command};
pub use launcher::{Launcher, ShellLauncher};
