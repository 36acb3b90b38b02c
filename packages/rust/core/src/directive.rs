//! Directive line parser.
//!
//! The first line of a document may carry build specifiers inside a comment:
//!
//! ```text
//! %engine=xelatex;options=-shell-escape;bib=biber;openwith=none;
//! ```
//!
//! Processing order:
//! 1. Spaces are removed everywhere except between a `=` and the next `;`, so
//!    values (viewer options, paths) keep their spaces.
//! 2. The first character, the comment marker, is dropped.
//! 3. Carriage returns are removed.
//! 4. The line is split on `;`, ignoring any `;` inside a double-quoted span.
//! 5. Each `key=value` pair is looked up by its exact key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use texbuild_shared::{Result, SpecifierKey, Specifiers, TexBuildError};

/// Pair separator inside a directive line.
const PAIR_SEPARATOR: char = ';';

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Specifiers found on one directive line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDirectives {
    /// Explicit values; keys that did not appear stay empty.
    pub specifiers: Specifiers,
    /// Keys that appeared, in order of appearance.
    pub found: Vec<SpecifierKey>,
    /// Pairs that did not name a known key.
    pub unrecognized: Vec<String>,
}

impl ParsedDirectives {
    /// Build keys (everything except `master`) that the line set explicitly.
    pub fn explicit_build_keys(&self) -> Vec<SpecifierKey> {
        let mut keys: Vec<SpecifierKey> = Vec::new();
        for key in &self.found {
            if *key != SpecifierKey::Master && !keys.contains(key) {
                keys.push(*key);
            }
        }
        keys
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read the first line of `path`, without its line terminator.
pub fn read_directive_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| TexBuildError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    reader
        .read_until(b'\n', &mut raw)
        .map_err(|e| TexBuildError::io(path, e))?;

    if raw.last() == Some(&b'\n') {
        raw.pop();
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

/// Remove spaces outside `=`…`;` value regions.
pub fn compact_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_value = false;

    for c in line.chars() {
        match c {
            '=' => in_value = true,
            ';' => in_value = false,
            _ => {}
        }
        if c == ' ' && !in_value {
            continue;
        }
        out.push(c);
    }

    out
}

/// Split `s` on `sep`, treating everything between double quotes as literal.
///
/// Quote state toggles on every `"`, balanced or not. Empty segments are dropped.
pub fn split_quoted(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut quoted = false;

    for c in s.chars() {
        if c == '"' {
            quoted = !quoted;
        }
        if quoted || c != sep {
            buffer.push(c);
        } else if !buffer.is_empty() {
            parts.push(std::mem::take(&mut buffer));
        }
    }
    if !buffer.is_empty() {
        parts.push(buffer);
    }

    parts
}

/// Turn a raw first line into its `key=value` pairs.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let compacted = compact_whitespace(line);
    let mut body = compacted.chars();
    body.next(); // comment marker
    let body: String = body.filter(|c| *c != '\r').collect();

    split_quoted(&body, PAIR_SEPARATOR)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split a pair at its first `=` and look the key up exactly.
pub fn match_pair(pair: &str) -> Option<(SpecifierKey, &str)> {
    let (name, value) = pair.split_once('=')?;
    SpecifierKey::from_name(name).map(|key| (key, value))
}

/// Parse a raw first line into specifiers.
pub fn parse_directive_line(line: &str) -> ParsedDirectives {
    let mut parsed = ParsedDirectives::default();

    for pair in tokenize_line(line) {
        match match_pair(&pair) {
            Some((key, value)) => {
                debug!(key = %key, value, "found specifier for {}", key.describe());
                if parsed.found.contains(&key) {
                    debug!(key = %key, "specifier given twice, keeping the later value");
                }
                parsed.specifiers.set(key, value);
                parsed.found.push(key);
            }
            None => {
                warn!(pair = %pair, "unknown specifier key, ignoring");
                parsed.unrecognized.push(pair);
            }
        }
    }

    parsed
}
