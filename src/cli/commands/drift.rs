//! `wft drift` command - Drift report against expected per-part totals

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_expected, open_store, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::OrderStore;
use crate::reconcile::{detect_drift, DriftClass, DriftReport};

#[derive(clap::Args, Debug)]
pub struct DriftArgs {
    /// Sales-order number
    pub so_number: String,

    /// Expected totals (.csv or .yaml); defaults to the configured expected_totals
    #[arg(long, short = 'e')]
    pub expected: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit with an error if any part is not OK
    #[arg(long)]
    pub fail_on_drift: bool,
}

pub fn run(args: DriftArgs, global: &GlobalOpts) -> Result<()> {
    let (project, config, store) = open_store(global)?;
    let snapshot = store.require(&args.so_number)?;
    let expected = load_expected(args.expected.as_deref(), &project, &config)?.ok_or_else(|| {
        miette::miette!(
            help = "Pass --expected <file> or run `wft config set expected_totals <file>`.",
            "no expected totals to compare against"
        )
    })?;

    let report = detect_drift(&snapshot, &expected);
    tracing::debug!(
        so_number = %report.so_number,
        parts = report.entries.len(),
        drifted = report.entries.iter().filter(|e| !e.is_ok()).count(),
        "drift computed"
    );

    let content = match resolve_format(global, &config) {
        OutputFormat::Json => serde_json::to_string_pretty(&report).into_diagnostic()? + "\n",
        OutputFormat::Yaml => serde_yml::to_string(&report).into_diagnostic()?,
        format @ (OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Id) => {
            render_table(&report, format)
        }
        OutputFormat::Auto | OutputFormat::Md => render_markdown(&report),
    };
    write_output(&content, args.output)?;

    if args.fail_on_drift && report.has_drift() {
        return Err(miette::miette!(
            "order '{}' has drift: {} wrong total(s), {} split part(s)",
            report.so_number,
            report.count(DriftClass::WrongTotal),
            report.count(DriftClass::StillSplit)
        ));
    }
    Ok(())
}

const DRIFT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part", "PART", 14),
    ColumnDef::new("db_total", "DB", 8),
    ColumnDef::new("expected", "EXPECTED", 9),
    ColumnDef::new("lines", "LINES", 6),
    ColumnDef::new("drift", "DRIFT", 26),
];

/// One row per part; `--format id` lists the parts that drifted
pub fn render_table(report: &DriftReport, format: OutputFormat) -> String {
    let rows: Vec<TableRow> = report
        .entries
        .iter()
        .filter(|e| format != OutputFormat::Id || !e.is_ok())
        .map(|entry| {
            TableRow::new(entry.part_number.clone())
                .cell("part", CellValue::Id(entry.part_number.clone()))
                .cell("db_total", CellValue::Qty(entry.db_total))
                .cell(
                    "expected",
                    entry.expected_total.map_or(CellValue::Empty, CellValue::Qty),
                )
                .cell("lines", CellValue::Qty(entry.line_item_count as i64))
                .cell("drift", CellValue::Drift(entry.classes.clone()))
        })
        .collect();
    TableFormatter::new(DRIFT_COLUMNS, "part")
        .with_config(TableConfig::for_pipe())
        .render(&rows, format)
}

/// Markdown drift report
pub fn render_markdown(report: &DriftReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Drift Report: {}\n\n", report.so_number));

    if report.entries.is_empty() {
        output.push_str("No parts on this order or in the expected totals.\n");
        return output;
    }

    let mut table = Builder::default();
    table.push_record(["Part", "DB Total", "Expected", "Delta", "Line Items", "Status"]);
    for entry in &report.entries {
        let classes: Vec<String> = entry.classes.iter().map(|c| c.to_string()).collect();
        table.push_record([
            entry.part_number.clone(),
            entry.db_total.to_string(),
            entry
                .expected_total
                .map_or_else(|| "-".to_string(), |e| e.to_string()),
            entry
                .delta()
                .map_or_else(|| "-".to_string(), |d| format!("{:+}", d)),
            entry.line_item_count.to_string(),
            classes.join(", "),
        ]);
    }
    output.push_str(&table.build().with(Style::markdown()).to_string());
    output.push_str("\n\n## Summary\n\n");

    let ok = report.count(DriftClass::Ok);
    output.push_str(&format!("- Parts: {}\n", report.entries.len()));
    output.push_str(&format!("- OK: {}\n", ok));
    output.push_str(&format!(
        "- WRONG_TOTAL: {}\n",
        report.count(DriftClass::WrongTotal)
    ));
    output.push_str(&format!(
        "- STILL_SPLIT: {}\n",
        report.count(DriftClass::StillSplit)
    ));
    output
}

fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    if let Some(path) = output_path {
        let file = File::create(&path).into_diagnostic()?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).into_diagnostic()?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    } else {
        print!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpectedTotals, OrderSnapshot};
    use crate::entities::{LineItem, Order, Tool};

    fn snapshot() -> OrderSnapshot {
        let mut snapshot = OrderSnapshot::new(Order::new("3930", "Acme"));
        snapshot.tools.push(Tool::new("3930", "3930-1").with_id("t1"));
        snapshot.tools.push(Tool::new("3930", "3930-2").with_id("t2"));
        snapshot.line_items.push(
            LineItem::new("3930", "613278", 6)
                .with_id("li-a")
                .with_tools(["t1"]),
        );
        snapshot.line_items.push(
            LineItem::new("3930", "613278", 4)
                .with_id("li-b")
                .with_tools(["t2"]),
        );
        snapshot
            .line_items
            .push(LineItem::new("3930", "613279", 24).with_id("li-c"));
        snapshot
    }

    #[test]
    fn test_render_markdown_rows_and_summary() {
        let expected: ExpectedTotals = [("613278", 6), ("613279", 24)].into_iter().collect();
        let report = detect_drift(&snapshot(), &expected);
        let md = render_markdown(&report);

        assert!(md.starts_with("# Drift Report: 3930\n"));
        let row = md
            .lines()
            .find(|l| l.contains("613278"))
            .expect("row for 613278");
        assert!(row.contains("WRONG_TOTAL, STILL_SPLIT"));
        assert!(row.contains("-4"));
        assert!(md.contains("- OK: 1\n"));
        assert!(md.contains("- WRONG_TOTAL: 1\n"));
        assert!(md.contains("- STILL_SPLIT: 1\n"));
    }

    #[test]
    fn test_render_table_csv_and_ids() {
        let expected: ExpectedTotals = [("613278", 6), ("613279", 24)].into_iter().collect();
        let report = detect_drift(&snapshot(), &expected);

        let csv = render_table(&report, OutputFormat::Csv);
        assert_eq!(
            csv,
            "part,db_total,expected,lines,drift\n\
             613278,10,6,2,\"WRONG_TOTAL, STILL_SPLIT\"\n\
             613279,24,24,1,OK\n"
        );
        assert_eq!(render_table(&report, OutputFormat::Id), "613278\n");
    }

    #[test]
    fn test_render_markdown_empty() {
        let report = detect_drift(&OrderSnapshot::new(Order::new("1", "A")), &ExpectedTotals::new());
        assert!(render_markdown(&report).contains("No parts"));
    }
}
