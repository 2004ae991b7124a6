//! `wft status` command - Fulfillment status for one order

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{open_store, print_structured, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{OrderSnapshot, OrderStore};
use crate::reconcile::{line_item_statuses, order_summary, tool_labels, tool_progress, ToolLabel};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Sales-order number
    pub so_number: String,

    /// Show progress for a single tool (tool number or id)
    #[arg(long, short = 't')]
    pub tool: Option<String>,

    /// Only show rows that still need picking
    #[arg(long)]
    pub incomplete: bool,
}

const LINE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "LINE ITEM", 32),
    ColumnDef::new("part", "PART", 14),
    ColumnDef::new("needed", "NEEDED", 7),
    ColumnDef::new("picked", "PICKED", 7),
    ColumnDef::new("remaining", "REMAINING", 10),
    ColumnDef::new("complete", "DONE", 5),
    ColumnDef::new("tools", "TOOLS", 30),
];

const TOOL_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "LINE ITEM", 32),
    ColumnDef::new("part", "PART", 14),
    ColumnDef::new("needed", "PER TOOL", 9),
    ColumnDef::new("picked", "PICKED", 7),
    ColumnDef::new("remaining", "REMAINING", 10),
    ColumnDef::new("complete", "DONE", 5),
];

#[derive(Serialize)]
struct StatusRow {
    #[serde(flatten)]
    status: crate::reconcile::LineItemStatus,
    tools: Vec<ToolLabel>,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;
    let format = resolve_format(global, &config);

    match &args.tool {
        Some(tool) => run_tool(&snapshot, tool, args.incomplete, format),
        None => run_order(&snapshot, args.incomplete, format),
    }
}

fn run_order(snapshot: &OrderSnapshot, incomplete: bool, format: OutputFormat) -> Result<()> {
    let rows: Vec<StatusRow> = snapshot
        .line_items
        .iter()
        .zip(line_item_statuses(snapshot))
        .filter(|(_, status)| !incomplete || !status.is_complete)
        .map(|(li, status)| StatusRow {
            status,
            tools: tool_labels(li, &snapshot.tools),
        })
        .collect();

    if print_structured(&rows, format)? {
        return Ok(());
    }

    if format == OutputFormat::Auto {
        print_header(snapshot);
    }

    let table_rows = rows.iter().map(|row| {
        let labels = row
            .tools
            .iter()
            .map(|label| match label {
                ToolLabel::Known(number) => number.clone(),
                ToolLabel::Missing(raw) => format!("{} (missing)", raw),
            })
            .collect();
        TableRow::new(row.status.line_item_id.clone())
            .cell("id", CellValue::Id(row.status.line_item_id.clone()))
            .cell("part", CellValue::Text(row.status.part_number.clone()))
            .cell("needed", CellValue::Qty(row.status.total_needed))
            .cell("picked", CellValue::Qty(row.status.total_picked))
            .cell("remaining", CellValue::Remaining(row.status.remaining))
            .cell("complete", CellValue::Complete(row.status.is_complete))
            .cell("tools", CellValue::Tags(labels))
    });
    formatter(LINE_COLUMNS, format).output(table_rows, format);
    Ok(())
}

fn run_tool(
    snapshot: &OrderSnapshot,
    tool: &str,
    incomplete: bool,
    format: OutputFormat,
) -> Result<()> {
    let target = snapshot.find_tool(tool).ok_or_else(|| {
        miette::miette!(
            help = "Pass a tool number or tool id from `wft order show <SO>`.",
            "tool '{}' not found in order '{}'",
            tool,
            snapshot.so_number()
        )
    })?;

    let Some(mut progress) = tool_progress(snapshot)
        .into_iter()
        .find(|p| p.tool_id == target.id)
    else {
        return Err(miette::miette!("no progress computed for tool '{}'", tool));
    };
    if incomplete {
        progress.lines.retain(|line| !line.is_complete);
    }

    if print_structured(&progress, format)? {
        return Ok(());
    }

    if format == OutputFormat::Auto {
        println!(
            "{} {} {}: {}/{} line item(s) complete",
            style("Tool").bold(),
            style(&progress.tool_number).cyan(),
            style(format!("({})", progress.tool_id)).dim(),
            progress.lines_complete(),
            progress.lines.len()
        );
        println!();
    }

    let rows = progress.lines.iter().map(|line| {
        TableRow::new(line.line_item_id.clone())
            .cell("id", CellValue::Id(line.line_item_id.clone()))
            .cell("part", CellValue::Text(line.part_number.clone()))
            .cell("needed", CellValue::Qty(line.needed))
            .cell("picked", CellValue::Qty(line.picked))
            .cell("remaining", CellValue::Remaining(line.remaining))
            .cell("complete", CellValue::Complete(line.is_complete))
    });
    formatter(TOOL_COLUMNS, format).output(rows, format);
    Ok(())
}

fn print_header(snapshot: &OrderSnapshot) {
    let summary = order_summary(snapshot);
    println!(
        "{} {} {}",
        style("Order").bold(),
        style(snapshot.so_number()).cyan(),
        style(format!("({})", snapshot.order.customer_name)).dim()
    );
    println!(
        "  {}/{} line item(s) complete, {}/{} picked ({:.1}%)",
        summary.complete,
        summary.line_items,
        summary.total_picked,
        summary.total_needed,
        summary.percent_complete
    );
    if summary.over_picked > 0 {
        println!(
            "  {} {} line item(s) over-picked",
            style("!").yellow(),
            summary.over_picked
        );
    }
    if summary.stale_refs > 0 {
        println!(
            "  {} {} reference(s) to deleted tools",
            style("!").yellow(),
            summary.stale_refs
        );
    }
    println!();
}

fn formatter(columns: &'static [ColumnDef], format: OutputFormat) -> TableFormatter<'static> {
    let config = if format == OutputFormat::Auto {
        TableConfig::default()
    } else {
        TableConfig::for_pipe()
    };
    TableFormatter::new(columns, "line item").with_config(config)
}
