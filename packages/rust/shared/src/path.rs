//! Path separator normalization.
//!
//! Both `sh` and Windows process creation accept `/` as a separator, so every
//! path-like value is rewritten to forward slashes before it reaches a command
//! line.

use std::path::Path;

/// Replace backslashes with `/` and collapse runs of separators to one.
pub fn normalize_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;

    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }

    out
}

/// Render a filesystem path as a normalized string.
pub fn display_path(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Render a directory for a `--xxx-directory="..."` flag (no trailing `/`).
pub fn display_dir(dir: &Path) -> String {
    let mut s = display_path(dir);
    if s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}
