//! Master document redirection.
//!
//! A document can name a master (`%master=../main.tex;`). When the master
//! exists it is built instead, and nothing from the redirecting document is
//! used. Redirections chain; the pipeline bounds them with a visited set and
//! a depth limit.

use std::path::{Path, PathBuf};

/// Where a redirection leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// No master set; build the current document.
    None,
    /// The master exists; resolve it instead.
    Follow { directory: PathBuf, file_name: String },
    /// The master was named but is not on disk.
    Missing { path: PathBuf },
}

/// Resolve `master` against `directory`.
///
/// Each leading `../` drops the last component of `directory`. The remainder is
/// joined on, so absolute masters replace the directory entirely.
pub fn locate_master(directory: &Path, master: &str) -> PathBuf {
    let mut base = directory.to_path_buf();
    let mut rel = master;
    while let Some(rest) = rel.strip_prefix("../") {
        base.pop();
        rel = rest;
    }
    base.join(rel)
}

/// Decide whether a document with effective master `master` redirects.
pub fn redirect(directory: &Path, master: &str) -> Redirect {
    if master.is_empty() {
        return Redirect::None;
    }

    let path = locate_master(directory, master);
    match (path.is_file(), path.parent(), path.file_name()) {
        (true, Some(parent), Some(name)) => Redirect::Follow {
            directory: parent.to_path_buf(),
            file_name: name.to_string_lossy().into_owned(),
        },
        _ => Redirect::Missing { path },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_segments_strip_directory_components() {
        assert_eq!(
            locate_master(Path::new("/home/me/thesis/chapters"), "../main.tex"),
            PathBuf::from("/home/me/thesis/main.tex")
        );
        assert_eq!(
            locate_master(Path::new("/home/me/thesis/chapters/"), "../../main.tex"),
            PathBuf::from("/home/me/main.tex")
        );
    }

    #[test]
    fn sibling_and_nested_masters() {
        assert_eq!(
            locate_master(Path::new("/t"), "main.tex"),
            PathBuf::from("/t/main.tex")
        );
        assert_eq!(
            locate_master(Path::new("/t"), "book/main.tex"),
            PathBuf::from("/t/book/main.tex")
        );
    }

    #[test]
    fn parent_segments_stop_at_root() {
        assert_eq!(
            locate_master(Path::new("/"), "../../main.tex"),
            PathBuf::from("/main.tex")
        );
    }

    #[test]
    fn empty_master_does_not_redirect() {
        assert_eq!(redirect(Path::new("/nowhere"), ""), Redirect::None);
    }

    #[test]
    fn redirect_to_existing_master() {
        let root = tempfile::tempdir().expect("tempdir");
        let chapters = root.path().join("chapters");
        std::fs::create_dir(&chapters).expect("mkdir");
        std::fs::write(root.path().join("main.tex"), "%engine=xelatex;\n").expect("write");

        assert_eq!(
            redirect(&chapters, "../main.tex"),
            Redirect::Follow {
                directory: root.path().to_path_buf(),
                file_name: "main.tex".into(),
            }
        );
    }

    #[test]
    fn redirect_to_missing_master() {
        let root = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            redirect(root.path(), "main.tex"),
            Redirect::Missing {
                path: root.path().join("main.tex"),
            }
        );
    }
}
