//! Expected part totals from an external source (e.g. the original import)

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::{parse_yaml_file, YamlError};

/// Expected total quantity per part number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedTotals(BTreeMap<String, i64>);

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "part", alias = "part_no")]
    part_number: String,
    #[serde(alias = "expected", alias = "total", alias = "qty")]
    expected_total: i64,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExpectedTotalsError {
    #[error("cannot read expected totals from {path}: {source}")]
    #[diagnostic(code(wft::expected::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    #[diagnostic(
        code(wft::expected::csv),
        help("Expected a header row `part_number,expected_total`.")
    )]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("part '{part_number}' is listed more than once in {path}")]
    #[diagnostic(code(wft::expected::duplicate))]
    DuplicatePart { path: PathBuf, part_number: String },

    #[error("unsupported expected totals format: {0} (use .csv, .yaml or .yml)")]
    #[diagnostic(code(wft::expected::format))]
    UnsupportedFormat(PathBuf),
}

impl ExpectedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a CSV or YAML file, chosen by extension
    pub fn load(path: &Path) -> Result<Self, ExpectedTotalsError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("csv") => {
                let file = std::fs::File::open(path).map_err(|source| ExpectedTotalsError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_csv_reader(file, path)
            }
            Some("yaml") | Some("yml") => Ok(parse_yaml_file(path)?),
            _ => Err(ExpectedTotalsError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse CSV rows of `part_number,expected_total`
    pub fn from_csv_reader<R: std::io::Read>(
        reader: R,
        origin: &Path,
    ) -> Result<Self, ExpectedTotalsError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut totals = BTreeMap::new();
        for row in rdr.deserialize::<CsvRow>() {
            let row = row.map_err(|source| ExpectedTotalsError::Csv {
                path: origin.to_path_buf(),
                source,
            })?;
            if totals.insert(row.part_number.clone(), row.expected_total).is_some() {
                return Err(ExpectedTotalsError::DuplicatePart {
                    path: origin.to_path_buf(),
                    part_number: row.part_number,
                });
            }
        }
        Ok(Self(totals))
    }

    pub fn insert(&mut self, part_number: impl Into<String>, total: i64) {
        self.0.insert(part_number.into(), total);
    }

    pub fn get(&self, part_number: &str) -> Option<i64> {
        self.0.get(part_number).copied()
    }

    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ExpectedTotals {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expected.csv");
        fs::write(&path, "part_number,expected_total\n613278, 6\n613279,24\n").unwrap();

        let totals = ExpectedTotals::load(&path).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.get("613278"), Some(6));
        assert_eq!(totals.get("613279"), Some(24));
        assert_eq!(totals.get("000000"), None);
    }

    #[test]
    fn test_load_csv_keeps_leading_zeros() {
        let totals =
            ExpectedTotals::from_csv_reader("part,qty\n007734,3\n".as_bytes(), Path::new("x.csv"))
                .unwrap();
        assert_eq!(totals.get("007734"), Some(3));
    }

    #[test]
    fn test_load_csv_duplicate_part() {
        let err = ExpectedTotals::from_csv_reader(
            "part_number,expected_total\n613278,6\n613278,4\n".as_bytes(),
            Path::new("x.csv"),
        )
        .unwrap_err();
        assert!(matches!(err, ExpectedTotalsError::DuplicatePart { .. }));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expected.yaml");
        fs::write(&path, "\"613278\": 6\n\"613279\": 24\n").unwrap();
        let totals = ExpectedTotals::load(&path).unwrap();
        assert_eq!(totals.get("613278"), Some(6));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ExpectedTotals::load(Path::new("expected.xlsx")).unwrap_err();
        assert!(matches!(err, ExpectedTotalsError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_from_iter() {
        let totals: ExpectedTotals = [("613278", 6), ("613279", 24)].into_iter().collect();
        assert_eq!(totals.parts().collect::<Vec<_>>(), vec!["613278", "613279"]);
    }
}
