//! End-to-end resolution: (directory, file) → resolved plan → invocation triple.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use texbuild_shared::{
    BuildConfig, Diagnostic, InvocationTriple, ResolvedPlan, Result, TexBuildError,
};

use crate::assembler;
use crate::defaults::{resolve_defaults, resolve_master};
use crate::directive::{parse_directive_line, read_directive_line};
use crate::master::{Redirect, redirect};

/// Result of resolving one top-level document.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    /// Plan for the document that is actually built.
    pub plan: ResolvedPlan,
    /// Commands derived from `plan`.
    pub triple: InvocationTriple,
    /// Non-fatal problems met along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Every document read, starting with the one requested.
    pub visited: Vec<PathBuf>,
}

/// Identity used for cycle detection.
fn identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve `file_name` in `directory` into a build plan and its commands.
///
/// Master redirections are followed until a document without a reachable
/// master is found. Only that final document's specifiers are used.
#[instrument(skip_all, fields(directory = %directory.display(), file = file_name))]
pub fn resolve_build(
    directory: &Path,
    file_name: &str,
    config: &BuildConfig,
) -> Result<BuildOutcome> {
    let requested = directory.join(file_name);
    if !requested.is_file() {
        return Err(TexBuildError::MissingInputFile { path: requested });
    }

    let mut directory = directory.to_path_buf();
    let mut file_name = file_name.to_string();
    let mut diagnostics = Vec::new();
    let mut visited: Vec<PathBuf> = Vec::new();

    loop {
        let document = directory.join(&file_name);
        let id = identity(&document);
        if visited.contains(&id) {
            let mut chain = visited;
            chain.push(id);
            return Err(TexBuildError::RedirectionCycle { chain });
        }
        if visited.len() > config.max_redirects {
            return Err(TexBuildError::RedirectionTooDeep {
                depth: config.max_redirects,
                path: document,
            });
        }
        visited.push(id);

        info!(document = %document.display(), "reading first line");
        let line = read_directive_line(&document)?;
        let parsed = parse_directive_line(&line);
        for pair in &parsed.unrecognized {
            diagnostics.push(Diagnostic::UnrecognizedSpecifier {
                document: document.clone(),
                pair: pair.clone(),
            });
        }

        let master = resolve_master(&parsed.specifiers.master, &config.defaults);
        match redirect(&directory, &master) {
            Redirect::Follow {
                directory: next_dir,
                file_name: next_file,
            } => {
                let ignored = parsed.explicit_build_keys();
                if !ignored.is_empty() {
                    let diag = Diagnostic::RedundantSpecifiers {
                        document: document.clone(),
                        master: master.clone(),
                        ignored,
                    };
                    warn!("{diag}");
                    diagnostics.push(diag);
                }
                info!(master = %master, "found master file, resolving it instead");
                directory = next_dir;
                file_name = next_file;
                continue;
            }
            Redirect::Missing { path } => {
                let diag = Diagnostic::MasterNotFound {
                    document: document.clone(),
                    master: path,
                };
                warn!("{diag}");
                diagnostics.push(diag);
            }
            Redirect::None => {}
        }

        let mut specifiers = resolve_defaults(parsed.specifiers, &config.defaults);
        specifiers.master = master;

        let plan = ResolvedPlan {
            document,
            directory,
            file_name,
            specifiers,
        };
        let triple = assembler::assemble(&plan, &config.toolchain, config.platform);

        return Ok(BuildOutcome {
            plan,
            triple,
            diagnostics,
            visited,
        });
    }
}
