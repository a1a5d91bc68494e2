//! JSON persistence of subjects.

use crate::error::{Error, Result};
use crate::model::RunSubject;
use std::fs;
use std::path::{Path, PathBuf};

/// Subject files found by [`scan_subjects`] carry this in their file name.
pub const SUBJECT_FILE_MARKER: &str = "run_subject";

/// A subject together with the file it was read from.
#[derive(Debug, Clone)]
pub struct StoredSubject {
    pub path: PathBuf,
    pub subject: RunSubject,
}

pub fn save_subject(path: &Path, subject: &RunSubject) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(subject)?)?;
    Ok(())
}

pub fn load_subject(path: &Path) -> Result<RunSubject> {
    let read = || -> Result<RunSubject> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    };
    read().map_err(|source| Error::Subject { path: path.to_path_buf(), source: Box::new(source) })
}

/// `.json` files under `dir` (recursively), sorted by path. With `marked_only`,
/// only files whose name contains [`SUBJECT_FILE_MARKER`].
pub fn subject_files(dir: &Path, marked_only: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".json") || (marked_only && !name.contains(SUBJECT_FILE_MARKER)) {
                continue;
            }
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Load every marked subject file under `dir`. Files that fail to load are
/// logged and skipped.
pub fn scan_subjects(dir: &Path) -> Result<Vec<StoredSubject>> {
    let mut out = Vec::new();
    for path in subject_files(dir, true)? {
        match load_subject(&path) {
            Ok(subject) => out.push(StoredSubject { path, subject }),
            Err(err) => tracing::warn!(%err, "skipping unreadable subject"),
        }
    }
    tracing::debug!(dir = %dir.display(), loaded = out.len(), "scanned subjects");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementTree, StyleMap};

    fn subject() -> RunSubject {
        let tree = ElementTree::new(vec![
            Element::element("div", "1", vec![Element::text("x"), Element::element("span", "2", vec![])]),
            Element::element("p", "none", vec![]),
        ]);
        let mut baseline = StyleMap::baseline();
        baseline.set("1", "display", "flex");
        let mut overrides = StyleMap::overrides();
        overrides.set("2", "color", "red");
        RunSubject::new(tree, baseline, overrides)
    }

    #[test]
    fn round_trip_preserves_all_three_structures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_run_subject.json");
        save_subject(&path, &subject()).unwrap();
        assert_eq!(load_subject(&path).unwrap(), subject());
    }

    #[test]
    fn scan_skips_unmarked_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        save_subject(&dir.path().join("1_run_subject.json"), &subject()).unwrap();
        save_subject(&nested.join("2_run_subject.json"), &subject()).unwrap();
        save_subject(&dir.path().join("other.json"), &subject()).unwrap();
        fs::write(dir.path().join("3_run_subject.json"), "[]").unwrap();

        let found = scan_subjects(dir.path()).unwrap();
        let names: Vec<_> = found.iter().map(|s| s.path.file_name().unwrap().to_str().unwrap().to_string()).collect();
        assert_eq!(names, vec!["1_run_subject.json", "2_run_subject.json"]);
        assert_eq!(subject_files(dir.path(), false).unwrap().len(), 4);
    }

    #[test]
    fn load_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_run_subject.json");
        fs::write(&path, "{").unwrap();
        let err = load_subject(&path).unwrap_err();
        assert!(err.to_string().contains("bad_run_subject.json"));
    }
}
