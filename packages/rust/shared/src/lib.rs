//! Shared types, error model, and configuration for TeXbuild.
//!
//! This crate is the foundation depended on by all other TeXbuild crates.
//! It provides:
//! - [`TexBuildError`]: the unified error type
//! - Domain types ([`SpecifierKey`], [`Specifiers`], [`ResolvedPlan`], [`InvocationTriple`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)
//! - Path separator normalization

pub mod config;
pub mod error;
pub mod path;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, DEFAULT_MAX_REDIRECTS, DefaultsConfig, TexDistribution,
    ToolchainConfig, ViewerConfig, config_dir, config_file_path, init_config,
    legacy_config_file_path, load_config, load_config_from, parse_legacy_defaults,
};
pub use error::{Result, TexBuildError};
pub use path::{display_dir, display_path, normalize_separators};
pub use types::{
    Diagnostic, InvocationTriple, Platform, ResolvedPlan, SENTINEL, SpecifierKey, Specifiers,
};
