//! Error types for TeXbuild.
//!
//! Library crates use [`TexBuildError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all TeXbuild operations.
#[derive(Debug, thiserror::Error)]
pub enum TexBuildError {
    /// The document named on the command line does not exist.
    #[error("file '{}' does not exist", path.display())]
    MissingInputFile { path: PathBuf },

    /// A master document points back at a document already visited.
    #[error("master redirection cycle: {}", format_chain(chain))]
    RedirectionCycle { chain: Vec<PathBuf> },

    /// Master redirection went deeper than the allowed limit.
    #[error("master redirection exceeded {depth} levels at '{}'", path.display())]
    RedirectionTooDeep { depth: usize, path: PathBuf },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An external program could not be started.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },

    /// The LaTeX engine exited unsuccessfully.
    #[error("document compilation failed (exit code {code:?}): {command}")]
    CompileFailed { command: String, code: Option<i32> },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TexBuildError>;

impl TexBuildError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a spawn failure with the command line that was attempted.
    pub fn launch(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            command: command.into(),
            source,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TexBuildError::config("unknown distribution");
        assert_eq!(err.to_string(), "config error: unknown distribution");

        let err = TexBuildError::MissingInputFile {
            path: PathBuf::from("/docs/thesis.tex"),
        };
        assert_eq!(err.to_string(), "file '/docs/thesis.tex' does not exist");
    }

    #[test]
    fn cycle_lists_every_hop() {
        let err = TexBuildError::RedirectionCycle {
            chain: vec![
                PathBuf::from("/a/ch1.tex"),
                PathBuf::from("/a/main.tex"),
                PathBuf::from("/a/ch1.tex"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "master redirection cycle: /a/ch1.tex -> /a/main.tex -> /a/ch1.tex"
        );
    }
}
