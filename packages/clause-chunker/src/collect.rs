//! Input discovery for the pipeline stages.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{META_SUFFIX, SCHEMA_SUFFIX};
use crate::error::{ChunkerError, Result};

/// Block tree files in `dir`: every `*.json` except `_meta.json` sidecars.
///
/// The result is sorted by file name so that runs are deterministic.
///
/// # Errors
///
/// Returns an error if `dir` is missing, is not a directory or cannot be read.
pub fn find_block_trees(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, |name| {
        name.ends_with(".json") && !name.ends_with(META_SUFFIX)
    })
}

/// Schema files in `dir` (`*_final_schema.json`), sorted by file name.
///
/// # Errors
///
/// Returns an error if `dir` is missing, is not a directory or cannot be read.
pub fn find_schema_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, |name| name.ends_with(SCHEMA_SUFFIX))
}

/// Copy converter output into the flat block tree directory.
///
/// The converter writes one directory per document, holding
/// `<doc>/<doc>.json` next to sidecars and images. Only the main JSON file
/// of each document is copied to `dest`. Returns the copied files, sorted.
///
/// # Errors
///
/// Returns an error if `marker_dir` cannot be listed or a copy fails.
pub fn collect_marker_outputs(marker_dir: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(marker_dir)?;
    fs::create_dir_all(dest)?;

    let mut doc_dirs = Vec::new();
    for entry in fs::read_dir(marker_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            doc_dirs.push(path);
        }
    }
    doc_dirs.sort();

    let mut collected = Vec::new();
    for doc_dir in doc_dirs {
        let Some(name) = doc_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = doc_dir.join(format!("{name}.json"));
        if !source.is_file() {
            tracing::debug!(path = %doc_dir.display(), "No block tree in converter output");
            continue;
        }

        let target = dest.join(format!("{name}.json"));
        fs::copy(&source, &target)?;
        tracing::info!(document_id = name, "Collected block tree");
        collected.push(target);
    }

    Ok(collected)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(ChunkerError::MissingDirectory(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ChunkerError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(&keep);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "{}").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_find_block_trees() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.json"));
        touch(&dir.path().join("a.json"));
        touch(&dir.path().join("a_meta.json"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("nested").join("c.json"));

        let found = find_block_trees(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_find_schema_files() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("x_final_schema.json"));
        touch(&dir.path().join("x.json"));

        let found = find_schema_files(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["x_final_schema.json"]);
    }

    #[test]
    fn test_missing_and_non_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            find_block_trees(&missing),
            Err(ChunkerError::MissingDirectory(_))
        ));

        let file = dir.path().join("file.json");
        touch(&file);
        assert!(matches!(
            find_schema_files(&file),
            Err(ChunkerError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_collect_marker_outputs() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("marker_json");
        let dest = dir.path().join("output_json");
        touch(&marker.join("doc1").join("doc1.json"));
        touch(&marker.join("doc1").join("doc1_meta.json"));
        touch(&marker.join("doc2").join("other.json"));
        touch(&marker.join("stray.json"));

        let collected = collect_marker_outputs(&marker, &dest).unwrap();

        assert_eq!(names(&collected), vec!["doc1.json"]);
        assert!(dest.join("doc1.json").is_file());
        assert!(!dest.join("doc1_meta.json").exists());
    }
}
