//! Default resolver: merges explicit specifiers with the configured defaults.
//!
//! For every key:
//! - an empty explicit value takes the configured default (skipped when the
//!   default is empty too, so the value simply stays empty);
//! - a value equal to [`SENTINEL`] after that step becomes empty, whether it
//!   came from the document or from the default;
//! - path-like values get their separators normalized.

use tracing::{debug, info};

use texbuild_shared::{DefaultsConfig, SENTINEL, SpecifierKey, Specifiers, normalize_separators};

/// Fill one value from its default and clear the sentinel.
fn fill(key: SpecifierKey, value: &mut String, default: &str) {
    if value.is_empty() && value.as_str() != default {
        info!(key = %key, default, "no specifier for {}, using default", key.describe());
        *value = default.to_string();
    }
    if *value == SENTINEL {
        debug!(key = %key, "specifier set to '{SENTINEL}', leaving it empty");
        value.clear();
    }
    if key.is_path_like() {
        *value = normalize_separators(value.as_str());
    }
}

/// Effective master for a document: explicit value, else the default master.
///
/// Empty means "build this document".
pub fn resolve_master(explicit: &str, defaults: &DefaultsConfig) -> String {
    let mut master = explicit.to_string();
    fill(SpecifierKey::Master, &mut master, defaults.value(SpecifierKey::Master));
    master
}

/// Resolve the seven build keys. `master` is passed through untouched.
pub fn resolve_defaults(mut specifiers: Specifiers, defaults: &DefaultsConfig) -> Specifiers {
    for key in SpecifierKey::BUILD {
        fill(key, specifiers.get_mut(key), defaults.value(key));
    }
    specifiers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_defaults() -> DefaultsConfig {
        DefaultsConfig::empty()
            .with(SpecifierKey::Engine, "pdflatex")
            .with(SpecifierKey::OutExt, ".pdf")
            .with(SpecifierKey::OpenWith, "none")
    }

    #[test]
    fn empty_values_take_non_empty_defaults() {
        let defaults = DefaultsConfig::empty()
            .with(SpecifierKey::Engine, "lualatex")
            .with(SpecifierKey::Options, "-synctex=1")
            .with(SpecifierKey::Bib, "biber")
            .with(SpecifierKey::BibOptions, "--quiet")
            .with(SpecifierKey::OutExt, ".dvi")
            .with(SpecifierKey::OpenWith, "evince")
            .with(SpecifierKey::OutOptions, "--fullscreen");

        let resolved = resolve_defaults(Specifiers::default(), &defaults);
        for key in SpecifierKey::BUILD {
            assert_eq!(resolved.get(key), defaults.value(key), "{key}");
        }
    }

    #[test]
    fn explicit_values_win() {
        let mut specs = Specifiers::default();
        specs.engine = "xelatex".into();
        let resolved = resolve_defaults(specs, &sample_defaults());
        assert_eq!(resolved.engine, "xelatex");
        assert_eq!(resolved.outext, ".pdf");
    }

    #[test]
    fn empty_default_leaves_value_empty() {
        let resolved = resolve_defaults(Specifiers::default(), &sample_defaults());
        assert_eq!(resolved.bib, "");
        assert_eq!(resolved.options, "");
    }

    #[test]
    fn sentinel_default_is_cleared() {
        let resolved = resolve_defaults(Specifiers::default(), &sample_defaults());
        assert_eq!(resolved.openwith, "");
    }

    #[test]
    fn sentinel_explicit_value_is_cleared_for_every_key() {
        let mut specs = Specifiers::default();
        for key in SpecifierKey::BUILD {
            specs.set(key, SENTINEL);
        }
        let defaults = DefaultsConfig::default().with(SpecifierKey::Bib, "biber");
        let resolved = resolve_defaults(specs, &defaults);
        for key in SpecifierKey::BUILD {
            assert_eq!(resolved.get(key), "", "{key}");
        }
    }

    #[test]
    fn path_like_values_are_normalized() {
        let mut specs = Specifiers::default();
        specs.openwith = r"C:\Program Files\SumatraPDF\SumatraPDF.exe".into();
        specs.engine = r"tools\\xelatex".into();
        let resolved = resolve_defaults(specs, &sample_defaults());
        assert_eq!(resolved.openwith, "C:/Program Files/SumatraPDF/SumatraPDF.exe");
        // engine is not path-like
        assert_eq!(resolved.engine, r"tools\\xelatex");
    }

    #[test]
    fn master_is_left_alone() {
        let mut specs = Specifiers::default();
        specs.master = "none".into();
        let resolved = resolve_defaults(specs, &sample_defaults());
        assert_eq!(resolved.master, "none");
    }

    #[test]
    fn master_falls_back_then_sentinel_clears() {
        let defaults = DefaultsConfig::empty().with(SpecifierKey::Master, "../main.tex");
        assert_eq!(resolve_master("", &defaults), "../main.tex");
        assert_eq!(resolve_master("none", &defaults), "");
        assert_eq!(resolve_master("", &DefaultsConfig::empty()), "");
        assert_eq!(resolve_master(r"..\main.tex", &DefaultsConfig::empty()), "../main.tex");
    }
}
