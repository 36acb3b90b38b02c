//! Application configuration for TeXbuild.
//!
//! User config lives at `~/.texbuild/texbuild.toml` (`%APPDATA%\TeXbuild\` on
//! Windows). A legacy `config.txt` with one `key=value` default per line is
//! still read when no TOML file is present. Directive lines in documents
//! override config values, which override compiled-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TexBuildError};
use crate::types::{Platform, SpecifierKey};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "texbuild.toml";

/// Legacy plain-text defaults file name.
const LEGACY_CONFIG_FILE_NAME: &str = "config.txt";

/// Config directory name under the user's home (non-Windows).
const CONFIG_DIR_NAME: &str = ".texbuild";

/// Config directory name under the roaming app data folder (Windows).
const WINDOWS_CONFIG_DIR_NAME: &str = "TeXbuild";

/// Hard limit on chained master redirections.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

// ---------------------------------------------------------------------------
// Config structs (matching texbuild.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default value per specifier.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// TeX distribution quirks.
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Viewer behaviour.
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// `[defaults]` section: the value used when a document leaves a specifier empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default master file. Normally empty, which disables redirection.
    #[serde(default)]
    pub master: String,

    #[serde(default = "default_engine")]
    pub engine: String,

    #[serde(default)]
    pub options: String,

    #[serde(default)]
    pub bib: String,

    #[serde(default)]
    pub biboptions: String,

    #[serde(default = "default_outext")]
    pub outext: String,

    #[serde(default = "default_openwith")]
    pub openwith: String,

    #[serde(default = "default_outoptions")]
    pub outoptions: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            master: String::new(),
            engine: default_engine(),
            options: String::new(),
            bib: String::new(),
            biboptions: String::new(),
            outext: default_outext(),
            openwith: default_openwith(),
            outoptions: default_outoptions(),
        }
    }
}

fn default_engine() -> String {
    "pdflatex".into()
}
fn default_outext() -> String {
    ".pdf".into()
}
fn default_openwith() -> String {
    if cfg!(windows) {
        r"C:\Program Files\SumatraPDF\SumatraPDF.exe".into()
    } else {
        "okular".into()
    }
}
fn default_outoptions() -> String {
    if cfg!(windows) {
        "-reuse-instance".into()
    } else {
        String::new()
    }
}

impl DefaultsConfig {
    /// Every default empty. Starting point for legacy `config.txt` files.
    pub fn empty() -> Self {
        Self {
            master: String::new(),
            engine: String::new(),
            options: String::new(),
            bib: String::new(),
            biboptions: String::new(),
            outext: String::new(),
            openwith: String::new(),
            outoptions: String::new(),
        }
    }

    /// The configured default for `key`.
    pub fn value(&self, key: SpecifierKey) -> &str {
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

    fn value_mut(&mut self, key: SpecifierKey) -> &mut String {
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

    /// Builder-style override, mostly for tests and CLI flags.
    pub fn with(mut self, key: SpecifierKey, value: impl Into<String>) -> Self {
        *self.value_mut(key) = value.into();
        self
    }
}

/// Which TeX distribution the engines come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexDistribution {
    #[default]
    TexLive,
    /// MiKTeX engines also need `--aux-directory`.
    MikTex,
}

impl TexDistribution {
    pub fn needs_aux_directory(self) -> bool {
        matches!(self, Self::MikTex)
    }
}

/// `[toolchain]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default)]
    pub distribution: TexDistribution,

    /// Pass `--include-directory` to bibliography engines that are not in
    /// `output_directory_bib_engines`.
    #[serde(default)]
    pub bib_include_directory: bool,

    /// Bibliography engines told about the working directory via
    /// `--output-directory`.
    #[serde(default = "default_output_directory_bib_engines")]
    pub output_directory_bib_engines: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            distribution: TexDistribution::default(),
            bib_include_directory: false,
            output_directory_bib_engines: default_output_directory_bib_engines(),
        }
    }
}

fn default_output_directory_bib_engines() -> Vec<String> {
    vec!["biber".into()]
}

/// `[viewer]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Send `SIGHUP` to an already running viewer instead of leaving it alone.
    #[serde(default)]
    pub refresh: bool,
}

// ---------------------------------------------------------------------------
// Build config (runtime, derived from the app config)
// ---------------------------------------------------------------------------

/// Everything the resolver and assembler read. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub defaults: DefaultsConfig,
    pub toolchain: ToolchainConfig,
    pub platform: Platform,
    /// Maximum number of master hops before giving up.
    pub max_redirects: usize,
}

impl From<&AppConfig> for BuildConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            defaults: config.defaults.clone(),
            toolchain: config.toolchain.clone(),
            platform: Platform::current(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl BuildConfig {
    /// Same config, commands built for another platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory.
pub fn config_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let roaming = dirs::config_dir()
            .ok_or_else(|| TexBuildError::config("could not determine app data directory"))?;
        return Ok(roaming.join(WINDOWS_CONFIG_DIR_NAME));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| TexBuildError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the TOML config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the path to the legacy `key=value` defaults file.
pub fn legacy_config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(LEGACY_CONFIG_FILE_NAME))
}

/// Load the application config from disk.
///
/// Prefers `texbuild.toml`, falls back to a legacy `config.txt`, and returns
/// compiled-in defaults when neither exists.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        return load_config_from(&path);
    }

    let legacy = legacy_config_file_path()?;
    if legacy.exists() {
        return load_config_from(&legacy);
    }

    tracing::debug!(?path, "config file not found, using defaults");
    Ok(AppConfig::default())
}

/// Load the application config from a specific file path.
///
/// `.txt` files are read as legacy `key=value` defaults, everything else as TOML.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TexBuildError::io(path, e))?;

    if path.extension().is_some_and(|ext| ext == "txt") {
        tracing::info!(?path, "reading legacy defaults");
        let (defaults, unknown) = parse_legacy_defaults(&content);
        for line in unknown {
            tracing::warn!(%line, "unrecognized line in legacy config, ignoring");
        }
        return Ok(AppConfig {
            defaults,
            ..AppConfig::default()
        });
    }

    toml::from_str(&content)
        .map_err(|e| TexBuildError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Parse a legacy `config.txt`. Returns the defaults and the lines that were not understood.
pub fn parse_legacy_defaults(content: &str) -> (DefaultsConfig, Vec<String>) {
    let mut defaults = DefaultsConfig::empty();
    let mut unknown = Vec::new();

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match line
            .split_once('=')
            .and_then(|(name, value)| SpecifierKey::from_name(name).map(|k| (k, value)))
        {
            Some((key, value)) => {
                tracing::debug!(key = %key, value, "default set from legacy config");
                *defaults.value_mut(key) = value.to_string();
            }
            None => unknown.push(line.to_string()),
        }
    }

    (defaults, unknown)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TexBuildError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(TexBuildError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TexBuildError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TexBuildError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("pdflatex"));
        assert!(toml_str.contains("texlive"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults, config.defaults);
        assert_eq!(parsed.toolchain.output_directory_bib_engines, ["biber"]);
    }

    #[test]
    fn partial_defaults_keep_compiled_values() {
        let toml_str = r#"
[defaults]
bib = "biber"
openwith = "none"

[toolchain]
distribution = "miktex"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.engine, "pdflatex");
        assert_eq!(config.defaults.outext, ".pdf");
        assert_eq!(config.defaults.bib, "biber");
        assert_eq!(config.defaults.openwith, "none");
        assert!(config.toolchain.distribution.needs_aux_directory());
        assert!(!config.viewer.refresh);
    }

    #[test]
    fn unknown_distribution_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[toolchain]\ndistribution = \"context\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn legacy_defaults_start_empty() {
        let (defaults, unknown) =
            parse_legacy_defaults("engine=lualatex\r\nbiboptions=--quiet\nfoo=bar\n\n");
        assert_eq!(defaults.engine, "lualatex");
        assert_eq!(defaults.biboptions, "--quiet");
        assert_eq!(defaults.outext, "");
        assert_eq!(unknown, ["foo=bar"]);
    }

    #[test]
    fn legacy_bib_does_not_swallow_biboptions() {
        let (defaults, _) = parse_legacy_defaults("biboptions=-q\nbib=bibtex\n");
        assert_eq!(defaults.bib, "bibtex");
        assert_eq!(defaults.biboptions, "-q");
    }

    #[test]
    fn build_config_from_app_config() {
        let app = AppConfig::default();
        let build = BuildConfig::from(&app).with_platform(Platform::Windows);
        assert_eq!(build.platform, Platform::Windows);
        assert_eq!(build.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(build.defaults.value(SpecifierKey::Engine), "pdflatex");
    }
}
