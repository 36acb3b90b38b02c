//! Command assembler.
//!
//! Turns a [`ResolvedPlan`] into the compile, bibliography, and view command
//! lines. Working-directory flags are injected unless the user already passed
//! them:
//!
//! ```text
//! <engine> --halt-on-error <options> [--aux-directory="<dir>"] --output-directory="<dir>" "<path>"
//! <bib> <biboptions> [--output-directory="<dir>" | --include-directory="<dir>"] "<stem>"
//! "<viewer>" "<dir>/<stem><outext>" <outoptions>
//! ```

use tracing::{debug, instrument};

use texbuild_shared::{
    InvocationTriple, Platform, ResolvedPlan, SENTINEL, ToolchainConfig, display_dir,
    display_path,
};

/// Appended to viewer options on Unix so the shell returns immediately.
const BACKGROUND_MARKER: &str = " &";

const AUX_DIRECTORY_FLAG: &str = "-aux-directory=";
const OUTPUT_DIRECTORY_FLAG: &str = "-output-directory=";
const INCLUDE_DIRECTORY_FLAG: &str = "-include-directory=";

/// Whether a resolved value asks for a command at all.
fn is_set(value: &str) -> bool {
    !value.is_empty() && value != SENTINEL
}

/// File name without its last extension.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    }
}

/// Append ` --<flag>"<dir>"` unless `options` already mentions the flag.
fn inject_directory(options: &mut String, flag: &str, dir: &str) {
    if !options.contains(flag) {
        options.push_str(&format!(" -{flag}\"{dir}\""));
    }
}

/// Build the [`InvocationTriple`] for a plan.
#[instrument(skip_all, fields(document = %plan.document.display()))]
pub fn assemble(
    plan: &ResolvedPlan,
    toolchain: &ToolchainConfig,
    platform: Platform,
) -> InvocationTriple {
    let specs = &plan.specifiers;
    let dir = display_dir(&plan.directory);
    let document = display_path(&plan.document);
    let stem = strip_extension(&plan.file_name);

    let mut options = specs.options.clone();
    if toolchain.distribution.needs_aux_directory() {
        inject_directory(&mut options, AUX_DIRECTORY_FLAG, &dir);
    }
    inject_directory(&mut options, OUTPUT_DIRECTORY_FLAG, &dir);

    let mut biboptions = specs.biboptions.clone();
    if toolchain
        .output_directory_bib_engines
        .iter()
        .any(|engine| *engine == specs.bib)
    {
        inject_directory(&mut biboptions, OUTPUT_DIRECTORY_FLAG, &dir);
    } else if toolchain.bib_include_directory {
        inject_directory(&mut biboptions, INCLUDE_DIRECTORY_FLAG, &dir);
    }

    let mut viewer_options = specs.outoptions.clone();
    if platform == Platform::Unix {
        viewer_options.push_str(BACKGROUND_MARKER);
    }

    let compile = is_set(&specs.engine)
        .then(|| format!("{} --halt-on-error {options} \"{document}\"", specs.engine));

    let bibliography =
        is_set(&specs.bib).then(|| format!("{} {biboptions} \"{stem}\"", specs.bib));

    let view = is_set(&specs.openwith).then(|| {
        let output = display_path(&plan.directory.join(stem));
        format!(
            "\"{}\" \"{output}{}\" {viewer_options}",
            specs.openwith, specs.outext
        )
    });

    debug!(?compile, ?bibliography, ?view, "assembled commands");

    InvocationTriple {
        compile,
        bibliography,
        view,
        viewer_options,
        viewer: specs.openwith.clone(),
    }
}
