//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::Project;

/// WFT configuration; later layers override earlier ones
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded on picks when device settings have no display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Default expected-totals file for parts/drift/audit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_totals: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_for(Project::discover().ok().as_ref())
    }

    /// Load configuration using the given project (if any) for the project layer
    pub fn load_for(project: Option<&Project>) -> Self {
        // 1. Built-in defaults
        let mut config = Config::default();

        // 2. Global user config (~/.config/wft/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.wft/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.wft_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("WFT_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(path) = std::env::var("WFT_EXPECTED_TOTALS") {
            config.expected_totals = Some(PathBuf::from(path));
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "wft").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.expected_totals.is_some() {
            self.expected_totals = other.expected_totals;
        }
    }

    /// The author name, falling back to git config or the login name
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            author: Some("Dana".to_string()),
            default_format: Some("tsv".to_string()),
            expected_totals: None,
        };
        base.merge(Config {
            author: None,
            default_format: Some("json".to_string()),
            expected_totals: Some(PathBuf::from("expected.csv")),
        });
        assert_eq!(base.author.as_deref(), Some("Dana"));
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.expected_totals, Some(PathBuf::from("expected.csv")));
    }

    #[test]
    fn test_explicit_author_wins() {
        let config = Config {
            author: Some("Dana".to_string()),
            ..Default::default()
        };
        assert_eq!(config.author(), "Dana");
    }

    #[test]
    fn test_project_layer_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(
            project.wft_dir().join("config.yaml"),
            "expected_totals: imports/expected.csv\n",
        )
        .unwrap();

        let config = Config::load_for(Some(&project));
        if std::env::var("WFT_EXPECTED_TOTALS").is_err() {
            assert_eq!(
                config.expected_totals,
                Some(PathBuf::from("imports/expected.csv"))
            );
        }
    }
}
