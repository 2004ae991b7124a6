//! `wft import` command - Load an order snapshot into the project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::{OrderSnapshot, OrderStore};
use crate::yaml::parse_yaml_file;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Snapshot file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Replace the order if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, _config, mut store) = open_store(global)?;
    let snapshot = read_snapshot(&args.file)?;
    let so_number = snapshot.so_number().to_string();

    let issues = snapshot.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {} {}", style("✗").red(), issue);
        }
        return Err(miette::miette!(
            help = "Fix the snapshot file and import again.",
            "order '{}' has {} structural issue(s); nothing was imported",
            so_number,
            issues.len()
        ));
    }

    let exists = store.fetch(&so_number)?.is_some();
    if exists && !args.force {
        return Err(miette::miette!(
            help = "Use --force to replace it.",
            "order '{}' already exists",
            so_number
        ));
    }

    store.save(&snapshot)?;
    tracing::info!(
        so_number = %so_number,
        tools = snapshot.tools.len(),
        line_items = snapshot.line_items.len(),
        picks = snapshot.picks.len(),
        replaced = exists,
        "order imported"
    );

    println!(
        "{} {} order {} ({} tool(s), {} line item(s), {} pick(s))",
        style("✓").green(),
        if exists { "Replaced" } else { "Imported" },
        style(&so_number).cyan(),
        snapshot.tools.len(),
        snapshot.line_items.len(),
        snapshot.picks.len()
    );
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<OrderSnapshot> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        serde_json::from_str(&contents)
            .map_err(|e| miette::miette!("invalid snapshot JSON in {}: {}", path.display(), e))
    } else {
        Ok(parse_yaml_file(path)?)
    }
}
