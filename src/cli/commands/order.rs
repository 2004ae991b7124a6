//! `wft order` command - Order listing, inspection and deletion

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{open_store, print_structured, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{OrderFilter, OrderSnapshot, OrderStore};
use crate::entities::OrderStatus;
use crate::reconcile::{line_item_statuses, order_summary, tool_labels, OrderSummary};

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// List orders with fulfillment progress
    List(ListArgs),

    /// Show an order with its tools and line items
    Show(ShowArgs),

    /// Delete an order and everything recorded against it
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status (pending, in_progress, complete, on_hold)
    #[arg(long, short = 's')]
    pub status: Option<OrderStatus>,

    /// Filter by customer name (case-insensitive substring)
    #[arg(long, short = 'c')]
    pub customer: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Sales-order number
    pub so_number: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Sales-order number
    pub so_number: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run an order subcommand
pub fn run(cmd: OrderCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        OrderCommands::List(args) => run_list(args, global),
        OrderCommands::Show(args) => run_show(args, global),
        OrderCommands::Delete(args) => run_delete(args, global),
    }
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("so", "SO", 12),
    ColumnDef::new("customer", "CUSTOMER", 28),
    ColumnDef::new("model", "MODEL", 14),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("tools", "TOOLS", 6),
    ColumnDef::new("lines", "LINES", 6),
    ColumnDef::new("progress", "PICKED", 8),
    ColumnDef::new("created", "CREATED", 17),
];

#[derive(Serialize)]
struct OrderListEntry<'a> {
    #[serde(flatten)]
    order: &'a crate::entities::Order,
    summary: OrderSummary,
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, config, store) = open_store(global)?;
    let filter = OrderFilter {
        status: args.status,
        customer: args.customer,
    };

    let orders = store.find_orders(&filter)?;

    if args.count {
        println!("{}", orders.len());
        return Ok(());
    }

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    let mut snapshots = Vec::with_capacity(orders.len());
    for order in &orders {
        match store.fetch(&order.so_number)? {
            Some(snapshot) => snapshots.push(snapshot),
            None => tracing::warn!(so_number = %order.so_number, "order vanished while listing"),
        }
    }

    let format = resolve_format(global, &config);
    let entries: Vec<OrderListEntry> = snapshots
        .iter()
        .map(|s| OrderListEntry {
            order: &s.order,
            summary: order_summary(s),
        })
        .collect();
    if print_structured(&entries, format)? {
        return Ok(());
    }

    let rows = entries.iter().map(|entry| {
        TableRow::new(entry.order.so_number.clone())
            .cell("so", CellValue::Id(entry.order.so_number.clone()))
            .cell("customer", CellValue::Text(entry.order.customer_name.clone()))
            .cell("model", CellValue::Text(entry.order.tool_model.clone()))
            .cell("status", CellValue::OrderStatus(entry.order.status))
            .cell("tools", CellValue::Qty(entry.summary.tools as i64))
            .cell("lines", CellValue::Qty(entry.summary.line_items as i64))
            .cell("progress", CellValue::Percent(entry.summary.percent_complete))
            .cell("created", CellValue::DateTime(entry.order.created))
    });
    TableFormatter::new(LIST_COLUMNS, "order").output(rows, format);
    Ok(())
}

const TOOL_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "TOOL", 12),
    ColumnDef::new("id", "ID", 32),
    ColumnDef::new("model", "MODEL", 14),
    ColumnDef::new("status", "STATUS", 12),
];

const LINE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "LINE ITEM", 32),
    ColumnDef::new("part", "PART", 14),
    ColumnDef::new("description", "DESCRIPTION", 28),
    ColumnDef::new("per_unit", "PER TOOL", 9),
    ColumnDef::new("needed", "NEEDED", 7),
    ColumnDef::new("remaining", "REMAINING", 10),
    ColumnDef::new("available", "AVAIL", 7),
    ColumnDef::new("on_order", "ON ORDER", 9),
    ColumnDef::new("short", "SHORT", 7),
    ColumnDef::new("tools", "TOOLS", 24),
];

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, _config, store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;

    match global.format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&snapshot).into_diagnostic()?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", snapshot.so_number());
        }
        _ => print_order(&snapshot),
    }
    Ok(())
}

fn print_order(snapshot: &OrderSnapshot) {
    let order = &snapshot.order;
    let summary = order_summary(snapshot);

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("SO").bold(), style(&order.so_number).cyan());
    println!(
        "{}: {}",
        style("Customer").bold(),
        style(&order.customer_name).yellow()
    );
    if !order.tool_model.is_empty() {
        println!(
            "{}: {} × {}",
            style("Tool Model").bold(),
            order.tool_model,
            order.quantity
        );
    }
    println!("{}: {}", style("Status").bold(), order.status);
    println!(
        "{}: {}",
        style("Created").bold(),
        order.created.format("%Y-%m-%d %H:%M")
    );
    if let Some(notes) = &order.notes {
        println!("{}: {}", style("Notes").bold(), notes);
    }
    println!(
        "{}: {}/{} line items complete, {}/{} picked ({:.1}%)",
        style("Progress").bold(),
        summary.complete,
        summary.line_items,
        summary.total_picked,
        summary.total_needed,
        summary.percent_complete
    );
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{}", style("Tools").bold());
    if snapshot.tools.is_empty() {
        println!("  {}", style("(none)").dim());
    } else {
        let rows = snapshot.tools.iter().map(|tool| {
            TableRow::new(tool.id.clone())
                .cell("number", CellValue::Id(tool.tool_number.clone()))
                .cell("id", CellValue::Text(tool.id.clone()))
                .cell(
                    "model",
                    tool.tool_model
                        .clone()
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Empty),
                )
                .cell("status", CellValue::Text(tool.status.to_string()))
        });
        TableFormatter::new(TOOL_COLUMNS, "tool").output(rows, OutputFormat::Tsv);
    }

    println!();
    println!("{}", style("Line Items").bold());
    if snapshot.line_items.is_empty() {
        println!("  {}", style("(none)").dim());
        return;
    }
    let rows = line_item_rows(snapshot);
    TableFormatter::new(LINE_COLUMNS, "line item").output(rows, OutputFormat::Tsv);
}

fn line_item_rows(snapshot: &OrderSnapshot) -> Vec<TableRow> {
    let statuses = line_item_statuses(snapshot);
    snapshot
        .line_items
        .iter()
        .zip(statuses)
        .map(|(li, status)| {
            let labels = tool_labels(li, &snapshot.tools)
                .iter()
                .map(ToString::to_string)
                .collect();
            TableRow::new(li.id.clone())
                .cell("id", CellValue::Id(li.id.clone()))
                .cell("part", CellValue::Text(li.part_number.clone()))
                .cell(
                    "description",
                    li.description
                        .clone()
                        .map(CellValue::Text)
                        .unwrap_or(CellValue::Empty),
                )
                .cell("per_unit", CellValue::Qty(li.qty_per_unit))
                .cell("needed", CellValue::Qty(li.total_qty_needed))
                .cell("remaining", CellValue::Remaining(status.remaining))
                .cell("available", CellValue::Qty(li.qty_available))
                .cell("on_order", CellValue::Qty(li.qty_on_order))
                .cell("short", CellValue::Remaining(li.shortage()))
                .cell("tools", CellValue::Tags(labels))
        })
        .collect()
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, _config, mut store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;

    if !args.yes {
        let prompt = format!(
            "Delete order {} ({}) with {} tool(s), {} line item(s) and {} pick(s)?",
            snapshot.so_number(),
            snapshot.order.customer_name,
            snapshot.tools.len(),
            snapshot.line_items.len(),
            snapshot.picks.len()
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("{}", style("Cancelled.").dim());
            return Ok(());
        }
    }

    store.delete_order(&args.so_number)?;
    tracing::info!(so_number = %args.so_number, "order deleted");
    println!(
        "{} Deleted order {}",
        style("✓").green(),
        style(&args.so_number).cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LineItem, Order, Tool};

    #[test]
    fn test_line_item_rows_show_stock_and_shortage() {
        let mut snapshot = OrderSnapshot::new(Order::new("3930", "Acme"));
        snapshot.tools.push(Tool::new("3930", "3930-1").with_id("t1"));
        let mut short = LineItem::new("3930", "613278", 6).with_id("li-a");
        short.qty_available = 1;
        short.qty_on_order = 2;
        let mut stocked = LineItem::new("3930", "613279", 4).with_id("li-b");
        stocked.qty_available = 10;
        snapshot.line_items = vec![short, stocked];

        let rows = line_item_rows(&snapshot);
        let csv = TableFormatter::new(LINE_COLUMNS, "line item").render(&rows, OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,part,description,per_unit,needed,remaining,available,on_order,short,tools"
        );
        assert_eq!(lines[1], "li-a,613278,,0,6,6,1,2,3,3930-1");
        assert_eq!(lines[2], "li-b,613279,,0,4,4,10,0,0,3930-1");
    }
}
