//! `wft config` command - Configuration management
//!
//! Provides commands to view and modify WFT configuration.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (see `wft config keys`)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only", conflicts_with = "global_only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Name recorded on picks when no device display name is set"),
    (
        "default_format",
        "Default output format (yaml, json, tsv, csv, md, id)",
    ),
    (
        "expected_totals",
        "Default expected-totals file for parts, drift and audit",
    ),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path(args) => run_path(args, global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global).ok();
    let config = Config::load_for(project.as_ref());

    if let Some(key) = &args.key {
        ensure_valid_key(key)?;
        return match get_config_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.project_only {
        show_config_file("Project config:", &project_config_path(global)?)
    } else if args.global_only {
        show_config_file("Global config:", &global_config_path()?)
    } else {
        println!("{}", style("Effective Configuration").bold().underlined());
        println!();
        for (key, _) in VALID_KEYS {
            print_config_value(key, get_config_value(&config, key).as_deref());
        }

        println!();
        println!("{}", style("Config Sources (in priority order):").dim());
        println!("  1. Environment variables (WFT_AUTHOR, WFT_EXPECTED_TOTALS)");
        println!("  2. Project config (.wft/config.yaml)");
        println!("  3. Global config (~/.config/wft/config.yaml)");
        Ok(())
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    ensure_valid_key(&args.key)?;
    let config_path = target_path(args.global, global)?;

    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );

    // Round-trip through Config so a bad value is caught before it is written
    let value = serde_yml::Value::Mapping(config_map);
    serde_yml::from_value::<Config>(value.clone())
        .map_err(|e| miette::miette!("invalid value for '{}': {}", args.key, e))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&value).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let config_path = target_path(args.global, global)?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let removed = config_map
        .remove(&serde_yml::Value::String(args.key.clone()))
        .is_some();
    if !removed {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(config_map)).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Removed {} from {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        scope
    );
    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    if args.project_only {
        println!("{}", project_config_path(global)?.display());
        return Ok(());
    }
    if args.global_only {
        println!("{}", global_config_path()?.display());
        return Ok(());
    }

    let global_path = global_config_path()?;
    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    print_exists(global_path.exists(), 9);

    println!();
    match project_config_path(global) {
        Ok(path) => {
            println!("  {} {}", style("Project:").cyan(), path.display());
            print_exists(path.exists(), 10);
        }
        Err(_) => println!(
            "  {} {}",
            style("Project:").cyan(),
            style("(not in a WFT project)").dim()
        ),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'wft config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn ensure_valid_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "Run `wft config keys` to list valid keys.",
            "unknown configuration key '{}'",
            key
        ))
    }
}

fn target_path(global_scope: bool, global: &GlobalOpts) -> Result<PathBuf> {
    if global_scope {
        global_config_path()
    } else {
        project_config_path(global)
    }
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn project_config_path(global: &GlobalOpts) -> Result<PathBuf> {
    Ok(open_project(global)?.wft_dir().join("config.yaml"))
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(map),
        Ok(_) => Ok(serde_yml::Mapping::new()),
        Err(e) => Err(miette::miette!(
            "cannot update {}: {}",
            path.display(),
            e
        )),
    }
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "author" => config.author.clone(),
        "default_format" => config.default_format.clone(),
        "expected_totals" => config
            .expected_totals
            .as_ref()
            .map(|p| p.display().to_string()),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_exists(exists: bool, indent: usize) {
    let label = if exists {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", label, indent = indent);
}

fn show_config_file(title: &str, path: &Path) -> Result<()> {
    println!("{} {}", style(title).bold(), style(path.display()).dim());
    println!();

    if path.exists() {
        let content = fs::read_to_string(path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}
