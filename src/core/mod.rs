//! Core module - storage, configuration and shared types

pub mod config;
pub mod entity;
pub mod expected;
pub mod identity;
pub mod loader;
pub mod picking;
pub mod project;
pub mod settings;
pub mod snapshot;
pub mod store;

pub use config::Config;
pub use entity::Record;
pub use expected::{ExpectedTotals, ExpectedTotalsError};
pub use identity::{RecordId, RecordPrefix};
pub use picking::{record_pick, undo_pick, PickError, PickRequest};
pub use project::{Project, ProjectError};
pub use settings::{
    FileSettingsStorage, MemorySettingsStorage, Settings, SettingsError, SettingsService,
    SettingsStorage, SettingsUpdate, Theme,
};
pub use snapshot::{OrderSnapshot, SnapshotIssue};
pub use store::{MemoryOrderStore, OrderFilter, OrderStore, StoreError, YamlOrderStore};
