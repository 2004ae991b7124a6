//! `wft audit` command - Reconciliation warnings across orders

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_expected, open_store, print_structured, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::OrderStore;
use crate::reconcile::{audit, AuditReport};

#[derive(clap::Args, Debug)]
pub struct AuditArgs {
    /// Orders to audit (default: all)
    pub so_numbers: Vec<String>,

    /// Expected totals (.csv or .yaml); defaults to the configured expected_totals
    #[arg(long, short = 'e')]
    pub expected: Option<PathBuf>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("so", "SO", 12),
    ColumnDef::new("kind", "KIND", 16),
    ColumnDef::new("detail", "DETAIL", 70),
];

pub fn run(args: AuditArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config, store) = open_store(global)?;
    let expected = load_expected(args.expected.as_deref(), &project, &config)?;

    let so_numbers = if args.so_numbers.is_empty() {
        store.order_numbers()?
    } else {
        args.so_numbers
    };

    let mut reports: Vec<AuditReport> = Vec::new();
    let mut skipped = 0usize;
    for so_number in &so_numbers {
        match store.fetch(so_number) {
            Ok(Some(snapshot)) => reports.push(audit(&snapshot, expected.as_ref())),
            Ok(None) => {
                tracing::warn!(so_number = %so_number, "order not found; skipping");
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!(so_number = %so_number, error = %e, "order failed to load; skipping");
                skipped += 1;
            }
        }
    }

    let format = resolve_format(global, &config);
    if print_structured(&reports, format)? {
        return Ok(());
    }

    let rows = reports.iter().flat_map(|report| {
        report.warnings.iter().map(move |warning| {
            TableRow::new(report.so_number.clone())
                .cell("so", CellValue::Id(report.so_number.clone()))
                .cell("kind", CellValue::Text(warning.kind().to_string()))
                .cell("detail", CellValue::Text(warning.to_string()))
        })
    });
    let rows: Vec<TableRow> = rows.collect();

    if format == OutputFormat::Auto && rows.is_empty() {
        println!(
            "{} {} order(s) audited, no warnings",
            style("✓").green(),
            reports.len()
        );
    } else {
        TableFormatter::new(COLUMNS, "warning").output(rows, format);
    }

    if skipped > 0 && format == OutputFormat::Auto {
        println!(
            "{} {} order(s) skipped (see log)",
            style("!").yellow(),
            skipped
        );
    }
    Ok(())
}
