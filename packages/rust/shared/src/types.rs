//! Core domain types for TeXbuild.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reserved value meaning "use no value here, and do not fall back to the default".
pub const SENTINEL: &str = "none";

// ---------------------------------------------------------------------------
// SpecifierKey
// ---------------------------------------------------------------------------

/// The closed set of keys a directive line (or the defaults) may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKey {
    /// Redirect the build to another document.
    Master,
    /// LaTeX engine, e.g. `pdflatex`, `xelatex`.
    Engine,
    /// Options passed to the engine.
    Options,
    /// Bibliography engine, e.g. `biber`, `bibtex`.
    Bib,
    /// Options passed to the bibliography engine.
    BibOptions,
    /// Extension of the output file, including the dot.
    OutExt,
    /// Program to open the output with.
    OpenWith,
    /// Options passed to the viewer.
    OutOptions,
}

impl SpecifierKey {
    /// Every key, in directive-table order.
    pub const ALL: [SpecifierKey; 8] = [
        Self::Master,
        Self::Engine,
        Self::Options,
        Self::Bib,
        Self::BibOptions,
        Self::OutExt,
        Self::OpenWith,
        Self::OutOptions,
    ];

    /// The keys that are filled from defaults once redirection is settled.
    pub const BUILD: [SpecifierKey; 7] = [
        Self::Engine,
        Self::Options,
        Self::Bib,
        Self::BibOptions,
        Self::OutExt,
        Self::OpenWith,
        Self::OutOptions,
    ];

    /// The key as written in a directive line (`engine`, `biboptions`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Engine => "engine",
            Self::Options => "options",
            Self::Bib => "bib",
            Self::BibOptions => "biboptions",
            Self::OutExt => "outext",
            Self::OpenWith => "openwith",
            Self::OutOptions => "outoptions",
        }
    }

    /// Human-readable description used in log lines.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Master => "master file",
            Self::Engine => "LaTeX engine",
            Self::Options => "LaTeX compiler options",
            Self::Bib => "bibliography engine",
            Self::BibOptions => "bibliography engine options",
            Self::OutExt => "output file extension",
            Self::OpenWith => "program to open output with",
            Self::OutOptions => "output viewer options",
        }
    }

    /// Exact lookup of a key name. `bib` never matches `biboptions`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether values for this key get separator normalization.
    pub fn is_path_like(self) -> bool {
        matches!(
            self,
            Self::Master | Self::Options | Self::BibOptions | Self::OpenWith | Self::OutOptions
        )
    }
}

impl fmt::Display for SpecifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Specifiers
// ---------------------------------------------------------------------------

/// One string per [`SpecifierKey`]. An empty string means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifiers {
    #[serde(default)]
    pub master: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub bib: String,
    #[serde(default)]
    pub biboptions: String,
    #[serde(default)]
    pub outext: String,
    #[serde(default)]
    pub openwith: String,
    #[serde(default)]
    pub outoptions: String,
}

impl Specifiers {
    pub fn get(&self, key: SpecifierKey) -> &str {
        match key {
            SpecifierKey::Master => &self.master,
            SpecifierKey::Engine => &self.engine,
            SpecifierKey::Options => &self.options,
            SpecifierKey::Bib => &self.bib,
            SpecifierKey::BibOptions => &self.biboptions,
            SpecifierKey::OutExt => &self.outext,
            SpecifierKey::OpenWith => &self.openwith,
            SpecifierKey::OutOptions => &self.outoptions,
        }
    }

    pub fn get_mut(&mut self, key: SpecifierKey) -> &mut String {
        match key {
            SpecifierKey::Master => &mut self.master,
            SpecifierKey::Engine => &mut self.engine,
            SpecifierKey::Options => &mut self.options,
            SpecifierKey::Bib => &mut self.bib,
            SpecifierKey::BibOptions => &mut self.biboptions,
            SpecifierKey::OutExt => &mut self.outext,
            SpecifierKey::OpenWith => &mut self.openwith,
            SpecifierKey::OutOptions => &mut self.outoptions,
        }
    }

    pub fn set(&mut self, key: SpecifierKey, value: impl Into<String>) {
        *self.get_mut(key) = value.into();
    }
}

// ---------------------------------------------------------------------------
// ResolvedPlan / InvocationTriple
// ---------------------------------------------------------------------------

/// The fully merged specifiers for the document that will actually be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlan {
    /// Absolute path of the document.
    pub document: PathBuf,
    /// Directory containing the document.
    pub directory: PathBuf,
    /// File name of the document, extension included.
    pub file_name: String,
    /// Default-filled, sentinel-cleared, normalized specifiers.
    pub specifiers: Specifiers,
}

/// The three command lines handed to the process launcher.
///
/// `None` means "do not invoke".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationTriple {
    pub compile: Option<String>,
    pub bibliography: Option<String>,
    pub view: Option<String>,
    /// Viewer options as they appear at the end of `view`.
    pub viewer_options: String,
    /// Viewer program, empty when nothing is opened.
    pub viewer: String,
}

/// Which family of process semantics commands are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Commands go through `sh -c`; viewers are backgrounded with `&`.
    Unix,
    /// Commands go through `cmd /C`; viewers are spawned detached.
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A recoverable problem noticed while resolving a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A directive pair whose key is not a known specifier.
    UnrecognizedSpecifier { document: PathBuf, pair: String },
    /// The master document does not exist; the current one is built instead.
    MasterNotFound { document: PathBuf, master: PathBuf },
    /// Specifiers given next to a master that will be used instead.
    RedundantSpecifiers {
        document: PathBuf,
        master: String,
        ignored: Vec<SpecifierKey>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedSpecifier { document, pair } => write!(
                f,
                "{}: unknown specifier key '{pair}', ignoring",
                document.display()
            ),
            Self::MasterNotFound { document, master } => write!(
                f,
                "{}: master file '{}' not found, compiling this file instead",
                document.display(),
                master.display()
            ),
            Self::RedundantSpecifiers {
                document,
                master,
                ignored,
            } => {
                let keys: Vec<&str> = ignored.iter().map(|k| k.as_str()).collect();
                write!(
                    f,
                    "{}: master '{master}' given alongside {}; those are ignored while the master exists",
                    document.display(),
                    keys.join(", ")
                )
            }
        }
    }
}
