//! Project discovery and layout
//!
//! A project is any directory containing a `.wft/` marker directory. Order
//! snapshots live under `orders/`, one YAML file per sales order.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker directory name
pub const WFT_DIR: &str = ".wft";

/// Directory holding one snapshot file per order
pub const ORDERS_DIR: &str = "orders";

#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .wft/)
    root: PathBuf,
}

impl Project {
    /// Find the project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Discover from an explicit start directory when given, else from the cwd
    pub fn locate(start: Option<&Path>) -> Result<Self, ProjectError> {
        match start {
            Some(dir) => Self::discover_from(dir),
            None => Self::discover(),
        }
    }

    /// Find the project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(WFT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(WFT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_layout(root)
    }

    /// Initialize even if .wft/ exists; rewrites the default config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_layout(root)
    }

    fn create_layout(root: PathBuf) -> Result<Self, ProjectError> {
        let wft_dir = root.join(WFT_DIR);
        std::fs::create_dir_all(&wft_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(wft_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join(ORDERS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# WFT Project Configuration

# Name recorded on picks when no display name is set in device settings
# author: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Expected part totals (CSV or YAML) used by parts/drift/audit when --expected is omitted
# expected_totals: imports/expected.csv
"#
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The .wft configuration directory
    pub fn wft_dir(&self) -> PathBuf {
        self.root.join(WFT_DIR)
    }

    pub fn orders_dir(&self) -> PathBuf {
        self.root.join(ORDERS_DIR)
    }

    /// Path of the snapshot file for a sales order
    pub fn order_path(&self, so_number: &str) -> PathBuf {
        self.orders_dir().join(format!("{}.yaml", order_file_stem(so_number)))
    }
}

/// File stem for an SO number; path separators and spaces become '_'
pub fn order_file_stem(so_number: &str) -> String {
    so_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a WFT project (searched from {searched_from:?}). Run 'wft init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("WFT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.wft_dir().is_dir());
        assert!(project.wft_dir().join("config.yaml").exists());
        assert!(project.orders_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_project_discover_from_nested_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("scans/2024");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::locate(Some(&subdir)).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_order_file_stem() {
        assert_eq!(order_file_stem("3930"), "3930");
        assert_eq!(order_file_stem("SO 12/3"), "SO_12_3");
    }
}
