//! `wft pick` command - Record, undo and list picks

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, picker_name, print_structured, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::{record_pick, undo_pick, OrderStore, PickRequest};
use crate::reconcile::compute_line_item_status;

#[derive(Subcommand, Debug)]
pub enum PickCommands {
    /// Record a pick for one tool against a line item
    Add(AddArgs),

    /// Reverse an earlier pick
    Undo(UndoArgs),

    /// List picks for an order
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Sales-order number
    pub so_number: String,

    /// Line item id
    #[arg(long, short = 'l')]
    pub line: String,

    /// Tool number or tool id
    #[arg(long, short = 't')]
    pub tool: String,

    /// Quantity picked (negative to correct a miscount)
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub qty: i64,

    /// Picker name (default: device display name, then config author)
    #[arg(long)]
    pub by: Option<String>,

    /// Free-form note stored with the pick
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UndoArgs {
    /// Sales-order number
    pub so_number: String,

    /// Id of the pick to reverse
    pub pick_id: String,

    /// Picker name (default: device display name, then config author)
    #[arg(long)]
    pub by: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Sales-order number
    pub so_number: String,

    /// Only picks for this line item
    #[arg(long, short = 'l')]
    pub line: Option<String>,
}

/// Run a pick subcommand
pub fn run(cmd: PickCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PickCommands::Add(args) => run_add(args, global),
        PickCommands::Undo(args) => run_undo(args, global),
        PickCommands::List(args) => run_list(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, mut store) = open_store(global)?;
    let picked_by = picker_name(args.by, &config);

    let pick = record_pick(
        &mut store,
        PickRequest {
            so_number: &args.so_number,
            line_item_id: &args.line,
            tool: &args.tool,
            qty: args.qty,
            picked_by: &picked_by,
            notes: args.notes,
        },
    )?;

    let snapshot = store.require(&args.so_number)?;
    println!(
        "{} Recorded pick {} ({} × {} for tool {}) by {}",
        style("✓").green(),
        style(&pick.id).cyan(),
        pick.qty_picked,
        args.line,
        args.tool,
        style(&pick.picked_by).yellow()
    );
    print_remaining(&snapshot, &pick.line_item_id);
    Ok(())
}

fn run_undo(args: UndoArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, mut store) = open_store(global)?;
    let picked_by = picker_name(args.by, &config);

    let reversal = undo_pick(&mut store, &args.so_number, &args.pick_id, &picked_by)?;

    let snapshot = store.require(&args.so_number)?;
    println!(
        "{} Reversed pick {} with {} ({})",
        style("✓").green(),
        style(&args.pick_id).cyan(),
        style(&reversal.id).cyan(),
        reversal.qty_picked
    );
    print_remaining(&snapshot, &reversal.line_item_id);
    Ok(())
}

fn print_remaining(snapshot: &crate::core::OrderSnapshot, line_item_id: &str) {
    let Some(line_item) = snapshot.line_item(line_item_id) else {
        return;
    };
    let status = compute_line_item_status(line_item, &snapshot.picks);
    let remaining = if status.is_over_picked() {
        style(format!("over-picked by {}", -status.remaining)).red().bold()
    } else if status.is_complete {
        style("complete".to_string()).green()
    } else {
        style(format!("{} remaining", status.remaining)).yellow()
    };
    println!(
        "  {} {}: {}/{} picked, {}",
        style("Part").dim(),
        status.part_number,
        status.total_picked,
        status.total_needed,
        remaining
    );
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "PICK", 32),
    ColumnDef::new("line", "LINE ITEM", 32),
    ColumnDef::new("tool", "TOOL", 12),
    ColumnDef::new("qty", "QTY", 6),
    ColumnDef::new("by", "BY", 16),
    ColumnDef::new("at", "AT", 17),
    ColumnDef::new("undoes", "UNDOES", 32),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;

    let picks: Vec<_> = snapshot
        .picks
        .iter()
        .filter(|p| args.line.as_deref().map_or(true, |line| p.line_item_id == line))
        .collect();

    let format = resolve_format(global, &config);
    if print_structured(&picks, format)? {
        return Ok(());
    }

    let rows = picks.iter().map(|pick| {
        let tool = snapshot
            .tool(&pick.tool_id)
            .map_or_else(|| pick.tool_id.clone(), |t| t.tool_number.clone());
        TableRow::new(pick.id.clone())
            .cell("id", CellValue::Id(pick.id.clone()))
            .cell("line", CellValue::Text(pick.line_item_id.clone()))
            .cell("tool", CellValue::Text(tool))
            .cell("qty", CellValue::Qty(pick.qty_picked))
            .cell("by", CellValue::Text(pick.picked_by.clone()))
            .cell("at", CellValue::DateTime(pick.picked_at))
            .cell(
                "undoes",
                pick.undoes
                    .clone()
                    .map(CellValue::Text)
                    .unwrap_or(CellValue::Empty),
            )
    });
    TableFormatter::new(COLUMNS, "pick").output(rows, format);
    Ok(())
}
