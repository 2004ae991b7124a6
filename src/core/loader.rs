//! Snapshot file loading
//!
//! Generic helpers for finding and reading YAML record files.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::yaml::{parse_yaml_file, YamlError};

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e == "yaml" || e == "yml")
}

/// All YAML files directly inside `dir`, sorted by file name
pub fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_yaml(p))
        .collect();
    files.sort();
    files
}

/// Load a single record, `Ok(None)` if the file does not exist
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, YamlError> {
    if !path.exists() {
        return Ok(None);
    }
    parse_yaml_file(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_files_nonexistent_dir() {
        assert!(yaml_files(Path::new("/nonexistent/orders")).is_empty());
    }

    #[test]
    fn test_yaml_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "qty: 2\n").unwrap();
        fs::write(dir.path().join("a.yaml"), "qty: 1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "qty: 3\n").unwrap();
        fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let names: Vec<String> = yaml_files(dir.path())
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_load_file_reports_syntax_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.yaml");
        fs::write(&path, "qty: [1,\n").unwrap();
        assert!(load_file::<BTreeMap<String, i64>>(&path).is_err());
    }

    #[test]
    fn test_load_file_missing_is_none() {
        let dir = tempdir().unwrap();
        let loaded: Option<serde_json::Value> = load_file(&dir.path().join("3930.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
