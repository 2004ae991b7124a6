//! `wft parts` command - Quantities aggregated by part number

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_expected, open_store, print_structured, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::OrderStore;
use crate::reconcile::aggregate_by_part;

#[derive(clap::Args, Debug)]
pub struct PartsArgs {
    /// Sales-order number
    pub so_number: String,

    /// Expected totals (.csv or .yaml); defaults to the configured expected_totals
    #[arg(long, short = 'e')]
    pub expected: Option<PathBuf>,

    /// Only show parts split across several line items
    #[arg(long)]
    pub split_only: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part", "PART", 14),
    ColumnDef::new("lines", "LINES", 6),
    ColumnDef::new("needed", "NEEDED", 7),
    ColumnDef::new("picked", "PICKED", 7),
    ColumnDef::new("remaining", "REMAINING", 10),
    ColumnDef::new("expected", "EXPECTED", 9),
    ColumnDef::new("split", "SPLIT", 6),
    ColumnDef::new("ids", "LINE ITEMS", 40),
];

pub fn run(args: PartsArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config, store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;
    let expected = load_expected(args.expected.as_deref(), &project, &config)?;

    let mut parts = aggregate_by_part(&snapshot, expected.as_ref());
    if args.split_only {
        parts.retain(|p| p.is_split());
    }

    let format = resolve_format(global, &config);
    if print_structured(&parts, format)? {
        return Ok(());
    }

    let rows = parts.iter().map(|part| {
        let expected_cell = match (part.expected_total, part.matches_expected()) {
            (Some(total), Some(true)) => CellValue::Qty(total),
            (Some(total), _) => CellValue::Text(format!("{} ≠", total)),
            (None, _) => CellValue::Empty,
        };
        TableRow::new(part.part_number.clone())
            .cell("part", CellValue::Id(part.part_number.clone()))
            .cell("lines", CellValue::Qty(part.line_item_count as i64))
            .cell("needed", CellValue::Qty(part.total_needed))
            .cell("picked", CellValue::Qty(part.total_picked))
            .cell("remaining", CellValue::Remaining(part.remaining()))
            .cell("expected", expected_cell)
            .cell("split", CellValue::Complete(part.is_split()))
            .cell("ids", CellValue::Tags(part.line_item_ids.clone()))
    });
    TableFormatter::new(COLUMNS, "part").output(rows, format);

    let split = parts.iter().filter(|p| p.is_split()).count();
    if split > 0 && format == OutputFormat::Auto {
        println!(
            "{} {} part(s) split across multiple line items; run {} to compare with expected totals",
            style("!").yellow(),
            split,
            style(format!("wft drift {} --expected <file>", snapshot.so_number())).yellow()
        );
    }
    Ok(())
}
