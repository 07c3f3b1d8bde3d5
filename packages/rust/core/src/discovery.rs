//! Markdown source discovery.
//!
//! Walks the documents directory recursively and returns every `.md` file
//! sorted lexicographically by full path, so the build order is stable
//! across runs for an unchanged file set.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use docforge_shared::{DocforgeError, Result};

/// Find all Markdown files under `docs_dir`, sorted lexicographically.
///
/// An unreadable directory or an empty result is a discovery failure; the
/// converter is never invoked with an empty input list.
pub fn discover_markdown(docs_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(docs_dir, &mut files).map_err(|e| {
        DocforgeError::Discovery(format!(
            "failed to read docs directory {}: {e}",
            docs_dir.display()
        ))
    })?;

    if files.is_empty() {
        return Err(DocforgeError::Discovery(format!(
            "no Markdown files found under {}",
            docs_dir.display()
        )));
    }

    files.sort();

    debug!(files = ?files, "markdown discovery order");
    info!(count = files.len(), dir = %docs_dir.display(), "markdown files discovered");
    Ok(files)
}

/// Recursively collect `.md` files into `out`.
///
/// Symlinked directories are not descended into, so a symlink cycle
/// under the docs dir cannot derail the walk. Symlinked `.md` files
/// are still listed, matching what `find` without `-L` reports.
fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // DirEntry::file_type does not follow symlinks.
        if entry.file_type()?.is_dir() {
            collect(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_docs() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docforge-discovery-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovery_sorts_lexicographically() {
        let dir = temp_docs();
        std::fs::write(dir.join("b.md"), "# B").unwrap();
        std::fs::write(dir.join("a.md"), "# A").unwrap();

        let files = discover_markdown(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discovery_is_stable_across_calls() {
        let dir = temp_docs();
        for name in ["10-intro.md", "02-setup.md", "01-overview.md"] {
            std::fs::write(dir.join(name), "#").unwrap();
        }

        let first = discover_markdown(&dir).unwrap();
        let second = discover_markdown(&dir).unwrap();
        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discovery_recurses_and_skips_non_markdown() {
        let dir = temp_docs();
        std::fs::create_dir_all(dir.join("chapters")).unwrap();
        std::fs::write(dir.join("intro.md"), "#").unwrap();
        std::fs::write(dir.join("chapters/one.md"), "#").unwrap();
        std::fs::write(dir.join("notes.txt"), "not markdown").unwrap();
        std::fs::write(dir.join("diagram.png"), [0u8; 4]).unwrap();

        let files = discover_markdown(&dir).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "md"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discovery_handles_spaces_in_names() {
        let dir = temp_docs();
        std::fs::write(dir.join("chapter one.md"), "#").unwrap();
        std::fs::write(dir.join("appendix.md"), "#").unwrap();

        let files = discover_markdown(&dir).unwrap();
        assert_eq!(files.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_does_not_derail_walk() {
        let dir = temp_docs();
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("a.md"), "#").unwrap();
        // sub/loop points back at the docs root.
        std::os::unix::fs::symlink(&dir, dir.join("sub/loop")).unwrap();

        let files = discover_markdown(&dir).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.md"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_markdown_file_is_listed() {
        let dir = temp_docs();
        std::fs::write(dir.join("real.md"), "#").unwrap();
        std::os::unix::fs::symlink(dir.join("real.md"), dir.join("alias.md")).unwrap();

        let files = discover_markdown(&dir).unwrap();
        assert_eq!(files.len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_discovery_error() {
        let dir = temp_docs().join("does-not-exist");
        let err = discover_markdown(&dir).unwrap_err();
        assert!(err.to_string().starts_with("discovery error"));
    }

    #[test]
    fn empty_directory_is_discovery_error() {
        let dir = temp_docs();
        let err = discover_markdown(&dir).unwrap_err();
        assert!(err.to_string().contains("no Markdown files"), "message: {err}");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
