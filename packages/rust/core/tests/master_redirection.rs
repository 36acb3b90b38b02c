use std::path::Path;

use tempfile::tempdir;
use texbuild_core::resolve_build;
use texbuild_shared::{AppConfig, BuildConfig, Diagnostic, Platform, SpecifierKey};

fn config() -> BuildConfig {
    BuildConfig::from(&AppConfig::default()).with_platform(Platform::Unix)
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).expect("write document");
}

#[test]
fn chapter_redirects_to_parent_master() {
    let root = tempdir().expect("tempdir");
    let chapters = root.path().join("chapters");
    std::fs::create_dir(&chapters).expect("mkdir chapters");
    write(&root.path().join("main.tex"), "%bib=biber;\n\\documentclass{book}\n");
    write(&chapters.join("intro.tex"), "%master=../main.tex;\n\\chapter{Intro}\n");

    let outcome = resolve_build(&chapters, "intro.tex", &config()).expect("resolve");

    assert_eq!(outcome.plan.file_name, "main.tex");
    assert_eq!(outcome.plan.directory, root.path());
    assert_eq!(outcome.plan.specifiers.bib, "biber");
    let bib = outcome.triple.bibliography.expect("bibliography command");
    assert!(bib.ends_with("\"main\""));
    assert_eq!(outcome.visited.len(), 2);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn redirecting_document_specifiers_are_never_applied() {
    let root = tempdir().expect("tempdir");
    write(&root.path().join("main.tex"), "%\n\\documentclass{article}\n");
    write(
        &root.path().join("part.tex"),
        "%master=main.tex;engine=xelatex;openwith=zathura;\n",
    );

    let outcome = resolve_build(root.path(), "part.tex", &config()).expect("resolve");

    let defaults = &config().defaults;
    assert_eq!(outcome.plan.specifiers.engine, defaults.engine);
    assert_eq!(outcome.plan.specifiers.openwith, defaults.openwith);
    assert_eq!(
        outcome.diagnostics,
        [Diagnostic::RedundantSpecifiers {
            document: root.path().join("part.tex"),
            master: "main.tex".into(),
            ignored: vec![SpecifierKey::Engine, SpecifierKey::OpenWith],
        }]
    );
}

#[test]
fn missing_master_builds_current_document_with_its_own_specifiers() {
    let root = tempdir().expect("tempdir");
    write(
        &root.path().join("part.tex"),
        "%master=../gone/main.tex;engine=xelatex;\n",
    );

    let outcome = resolve_build(root.path(), "part.tex", &config()).expect("resolve");

    assert_eq!(outcome.plan.file_name, "part.tex");
    assert_eq!(outcome.plan.specifiers.engine, "xelatex");
    assert!(matches!(
        outcome.diagnostics.as_slice(),
        [Diagnostic::MasterNotFound { .. }]
    ));
}

#[test]
fn no_master_resolves_like_a_direct_build() {
    let root = tempdir().expect("tempdir");
    write(&root.path().join("a.tex"), "%engine=lualatex;bib=bibtex;\n");
    write(&root.path().join("b.tex"), "%master=none;engine=lualatex;bib=bibtex;\n");

    let direct = resolve_build(root.path(), "a.tex", &config()).expect("resolve a");
    let sentinel = resolve_build(root.path(), "b.tex", &config()).expect("resolve b");

    assert_eq!(direct.plan.specifiers, sentinel.plan.specifiers);
    assert_eq!(direct.visited.len(), 1);
    assert_eq!(sentinel.visited.len(), 1);
}

#[test]
fn mutual_masters_are_reported_as_a_cycle() {
    let root = tempdir().expect("tempdir");
    write(&root.path().join("a.tex"), "%master=b.tex;\n");
    write(&root.path().join("b.tex"), "%master=a.tex;\n");

    let err = resolve_build(root.path(), "a.tex", &config()).unwrap_err();
    assert!(err.to_string().contains("master redirection cycle"));
}
