//! Shared helper functions for CLI commands
//!
//! Project/store opening, output-format resolution, expected-totals lookup
//! and the small string helpers used by the table renderer.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    Config, ExpectedTotals, FileSettingsStorage, Project, SettingsService, YamlOrderStore,
};

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Find the project from `--project` or the current directory
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))
}

/// Open the project, its layered config and its order store
pub fn open_store(global: &GlobalOpts) -> Result<(Project, Config, YamlOrderStore)> {
    let project = open_project(global)?;
    let config = Config::load_for(Some(&project));
    let store = YamlOrderStore::new(&project);
    Ok((project, config, store))
}

/// `--format auto` defers to the configured default_format, if any
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref() {
        Some(name) => OutputFormat::from_str(name, true).unwrap_or_else(|_| {
            tracing::warn!(default_format = name, "ignoring unknown default_format");
            OutputFormat::Auto
        }),
        None => OutputFormat::Auto,
    }
}

/// Expected-totals path: the explicit flag, else the configured default
///
/// A relative configured path is resolved against the project root.
pub fn expected_totals_path(
    explicit: Option<&Path>,
    project: &Project,
    config: &Config,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    config.expected_totals.as_ref().map(|path| {
        if path.is_relative() {
            project.root().join(path)
        } else {
            path.clone()
        }
    })
}

/// Load expected totals if a source is available
pub fn load_expected(
    explicit: Option<&Path>,
    project: &Project,
    config: &Config,
) -> Result<Option<ExpectedTotals>> {
    match expected_totals_path(explicit, project, config) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading expected totals");
            Ok(Some(ExpectedTotals::load(&path)?))
        }
        None => Ok(None),
    }
}

/// Name to record on picks: explicit, then the device display name, then the config author
pub fn picker_name(explicit: Option<String>, config: &Config) -> String {
    if let Some(name) = explicit.filter(|n| !n.trim().is_empty()) {
        return name.trim().to_string();
    }
    let display_name = FileSettingsStorage::default_location()
        .and_then(|storage| SettingsService::new(storage).current())
        .map(|settings| settings.display_name);
    match display_name {
        Ok(Some(name)) => name,
        Ok(None) => config.author(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read device settings");
            config.author()
        }
    }
}

/// Print a value as JSON or YAML; returns false for the tabular formats
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Müller Maschinenbau", 9), "Müller...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_resolve_format_uses_config_default() {
        let global = GlobalOpts::default();
        let config = Config {
            default_format: Some("csv".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(&global, &config), OutputFormat::Csv);

        let explicit = GlobalOpts {
            format: OutputFormat::Json,
            ..GlobalOpts::default()
        };
        assert_eq!(resolve_format(&explicit, &config), OutputFormat::Json);

        let unknown = Config {
            default_format: Some("xml".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(&global, &unknown), OutputFormat::Auto);
    }

    #[test]
    fn test_expected_totals_path_resolution() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let config = Config {
            expected_totals: Some(PathBuf::from("expected.csv")),
            ..Config::default()
        };

        assert_eq!(
            expected_totals_path(None, &project, &config),
            Some(project.root().join("expected.csv"))
        );
        assert_eq!(
            expected_totals_path(Some(Path::new("other.yaml")), &project, &config),
            Some(PathBuf::from("other.yaml"))
        );
        assert_eq!(expected_totals_path(None, &project, &Config::default()), None);
    }

    #[test]
    fn test_picker_name_explicit_wins() {
        assert_eq!(picker_name(Some(" Dana ".to_string()), &Config::default()), "Dana");
    }
}
