//! CLI command implementations

pub mod audit;
pub mod cleanup;
pub mod completions;
pub mod config;
pub mod drift;
pub mod import;
pub mod init;
pub mod order;
pub mod parts;
pub mod pick;
pub mod settings;
pub mod status;
