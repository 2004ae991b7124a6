//! Per-device settings
//!
//! Settings are an immutable value. Changes go through [`Settings::apply`],
//! which takes a [`SettingsUpdate`] naming only the fields to change and
//! returns a new value. Where the value lives is behind [`SettingsStorage`]
//! so the update logic can be exercised without touching the disk.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::System => write!(f, "system"),
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Pick feedback toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Vibrate on a recorded pick
    pub haptics: bool,
    /// Celebrate when a line item completes
    pub confetti: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            haptics: true,
            confetti: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded on picks made from this device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    pub theme: Theme,

    pub features: FeatureFlags,
}

/// A partial change to [`Settings`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    /// `Some(None)` clears the display name
    pub display_name: Option<Option<String>>,
    pub theme: Option<Theme>,
    pub haptics: Option<bool>,
    pub confetti: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == SettingsUpdate::default()
    }
}

impl Settings {
    /// Return a copy with the update applied
    #[must_use]
    pub fn apply(&self, update: &SettingsUpdate) -> Settings {
        let display_name = match &update.display_name {
            Some(name) => name
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            None => self.display_name.clone(),
        };

        Settings {
            display_name,
            theme: update.theme.unwrap_or(self.theme),
            features: FeatureFlags {
                haptics: update.haptics.unwrap_or(self.features.haptics),
                confetti: update.confetti.unwrap_or(self.features.confetti),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no settings directory available on this platform")]
    NoSettingsDir,

    #[error("failed to read settings: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),

    #[error("settings file is not valid YAML: {0}")]
    Parse(#[from] serde_yml::Error),
}

/// Where settings are persisted
pub trait SettingsStorage {
    /// Stored settings, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// YAML file in the platform data directory
#[derive(Debug, Clone)]
pub struct FileSettingsStorage {
    path: PathBuf,
}

impl FileSettingsStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/wft/settings.yaml`
    pub fn default_location() -> Result<Self, SettingsError> {
        directories::ProjectDirs::from("", "", "wft")
            .map(|dirs| Self::new(dirs.data_dir().join("settings.yaml")))
            .ok_or(SettingsError::NoSettingsDir)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStorage for FileSettingsStorage {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(SettingsError::Read)?;
        Ok(Some(serde_yml::from_str(&contents)?))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::Write)?;
        }
        let yaml = serde_yml::to_string(settings)?;
        std::fs::write(&self.path, yaml).map_err(SettingsError::Write)
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStorage {
    stored: RefCell<Option<Settings>>,
}

impl SettingsStorage for MemorySettingsStorage {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.stored.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}

/// Loads settings and persists updates through a storage backend
pub struct SettingsService<S: SettingsStorage> {
    storage: S,
}

impl<S: SettingsStorage> SettingsService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored settings, or defaults if none were saved
    pub fn current(&self) -> Result<Settings, SettingsError> {
        Ok(self.storage.load()?.unwrap_or_default())
    }

    /// Apply an update, persist it, and return the new settings
    pub fn update(&self, update: &SettingsUpdate) -> Result<Settings, SettingsError> {
        let next = self.current()?.apply(update);
        self.storage.save(&next)?;
        tracing::debug!(?update, "settings updated");
        Ok(next)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_changes_only_named_fields() {
        let original = Settings {
            display_name: Some("Dana".to_string()),
            theme: Theme::Dark,
            features: FeatureFlags::default(),
        };
        let update = SettingsUpdate {
            confetti: Some(false),
            ..Default::default()
        };

        let next = original.apply(&update);
        assert_eq!(next.display_name.as_deref(), Some("Dana"));
        assert_eq!(next.theme, Theme::Dark);
        assert!(next.features.haptics);
        assert!(!next.features.confetti);
        // original value untouched
        assert!(original.features.confetti);
    }

    #[test]
    fn test_apply_clears_and_trims_display_name() {
        let original = Settings {
            display_name: Some("Dana".to_string()),
            ..Default::default()
        };
        let cleared = original.apply(&SettingsUpdate {
            display_name: Some(None),
            ..Default::default()
        });
        assert!(cleared.display_name.is_none());

        let renamed = original.apply(&SettingsUpdate {
            display_name: Some(Some("  Sam  ".to_string())),
            ..Default::default()
        });
        assert_eq!(renamed.display_name.as_deref(), Some("Sam"));

        let blank = original.apply(&SettingsUpdate {
            display_name: Some(Some("   ".to_string())),
            ..Default::default()
        });
        assert!(blank.display_name.is_none());
    }

    #[test]
    fn test_empty_update_is_identity() {
        let original = Settings::default();
        assert!(SettingsUpdate::default().is_empty());
        assert_eq!(original.apply(&SettingsUpdate::default()), original);
    }

    #[test]
    fn test_service_with_memory_storage() {
        let service = SettingsService::new(MemorySettingsStorage::default());
        assert_eq!(service.current().unwrap(), Settings::default());

        service
            .update(&SettingsUpdate {
                theme: Some(Theme::Light),
                ..Default::default()
            })
            .unwrap();
        let next = service
            .update(&SettingsUpdate {
                display_name: Some(Some("Dana".to_string())),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(next.theme, Theme::Light);
        assert_eq!(next.display_name.as_deref(), Some("Dana"));
        assert_eq!(service.storage().load().unwrap(), Some(next));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileSettingsStorage::new(tmp.path().join("nested/settings.yaml"));
        assert!(storage.load().unwrap().is_none());

        let settings = Settings {
            display_name: Some("Dana".to_string()),
            theme: Theme::Dark,
            features: FeatureFlags {
                haptics: false,
                confetti: true,
            },
        };
        storage.save(&settings).unwrap();
        assert_eq!(storage.load().unwrap(), Some(settings));
    }
}
