//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    audit::AuditArgs, cleanup::CleanupArgs, completions::CompletionsArgs, config::ConfigCommands,
    drift::DriftArgs, import::ImportArgs, init::InitArgs, order::OrderCommands, parts::PartsArgs,
    pick::PickCommands, settings::SettingsCommands, status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "wft")]
#[command(author, version, about = "Warehouse Fulfillment Toolkit")]
#[command(
    long_about = "Reconcile warehouse order fulfillment: what each order needs, what has been picked, and where the data has drifted."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output (log errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .wft/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

impl GlobalOpts {
    /// Log filter implied by --quiet/--verbose (RUST_LOG takes precedence)
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "wft=debug"
        } else if self.quiet {
            "error"
        } else {
            "wft=warn"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new WFT project
    Init(InitArgs),

    /// Order management (list, show, delete)
    #[command(subcommand)]
    Order(OrderCommands),

    /// Import an order snapshot (YAML or JSON)
    Import(ImportArgs),

    /// Per-line-item fulfillment status for an order
    Status(StatusArgs),

    /// Totals by part number, flagging split parts
    Parts(PartsArgs),

    /// Compare an order against expected per-part totals
    Drift(DriftArgs),

    /// Report reconciliation warnings across orders
    Audit(AuditArgs),

    /// Record, undo and list picks
    #[command(subcommand)]
    Pick(PickCommands),

    /// Remove partially-created orders
    Cleanup(CleanupArgs),

    /// Per-device settings (display name, theme, feature flags)
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Layered configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter() {
        let mut opts = GlobalOpts::default();
        assert_eq!(opts.log_filter(), "wft=warn");
        opts.quiet = true;
        assert_eq!(opts.log_filter(), "error");
        opts.verbose = true;
        assert_eq!(opts.log_filter(), "wft=debug");
    }

    #[test]
    fn test_parse_pick_add() {
        let cli = Cli::try_parse_from([
            "wft", "pick", "add", "3930", "--line", "li-279", "--tool", "3930-1", "--qty", "12",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Pick(_)));
        assert_eq!(cli.global.format, OutputFormat::Auto);
    }
}
