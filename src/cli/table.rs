//! Table formatting for CLI list/report commands
//!
//! Commands build [`TableRow`]s of typed [`CellValue`]s and hand them to a
//! [`TableFormatter`], which renders TSV (coloured when on a terminal), CSV,
//! Markdown or bare ids. JSON and YAML are serialized by the commands
//! themselves from the reconciliation results.

use chrono::{DateTime, Local, Utc};
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::OrderStatus;
use crate::reconcile::DriftClass;

#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 order(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// No summary
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record id or SO number (cyan)
    Id(String),
    /// Plain text, truncated to the column
    Text(String),
    OrderStatus(OrderStatus),
    /// Plain quantity, right aligned
    Qty(i64),
    /// Remaining quantity: red when over-picked, green at zero, yellow otherwise
    Remaining(i64),
    /// Completion flag (✓ green / - dim)
    Complete(bool),
    /// Drift classes (OK green, anything else yellow)
    Drift(Vec<DriftClass>),
    /// Percentage with one decimal
    Percent(f64),
    DateTime(DateTime<Utc>),
    /// Comma-joined list
    Tags(Vec<String>),
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width.saturating_sub(2)), width = width)
            }
            CellValue::OrderStatus(status) => {
                let s = status.to_string();
                let styled = match status {
                    OrderStatus::Pending => style(s).dim(),
                    OrderStatus::InProgress => style(s).yellow(),
                    OrderStatus::Complete => style(s).green(),
                    OrderStatus::OnHold => style(s).red(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Qty(n) => format!("{:>width$}", n, width = width),
            CellValue::Remaining(n) => {
                let styled = if *n < 0 {
                    style(n.to_string()).red().bold()
                } else if *n == 0 {
                    style(n.to_string()).green()
                } else {
                    style(n.to_string()).yellow()
                };
                format!("{:>width$}", styled, width = width)
            }
            CellValue::Complete(done) => {
                let styled = if *done { style("✓").green() } else { style("-").dim() };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Drift(classes) => {
                let text = join_classes(classes);
                let styled = if classes.iter().all(|c| *c == DriftClass::Ok) {
                    style(text).green()
                } else {
                    style(text).yellow().bold()
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Percent(p) => format!("{:>width$}", format!("{:.1}%", p), width = width),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                format!("{:<width$}", local.format("%Y-%m-%d %H:%M"), width = width)
            }
            CellValue::Tags(tags) => {
                let joined = tags.join(", ");
                format!(
                    "{:<width$}",
                    truncate_str(&joined, width.saturating_sub(2)),
                    width = width
                )
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Complete(done) => if *done { "yes" } else { "no" }.to_string(),
            CellValue::Percent(p) => format!("{:.1}", p),
            CellValue::Empty => String::new(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Complete(done) => if *done { "✓" } else { "-" }.to_string(),
            CellValue::Remaining(n) if *n < 0 => format!("**{}**", n),
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) => s.clone(),
            CellValue::OrderStatus(status) => status.to_string(),
            CellValue::Qty(n) | CellValue::Remaining(n) => n.to_string(),
            CellValue::Complete(done) => if *done { "yes" } else { "no" }.to_string(),
            CellValue::Drift(classes) => join_classes(classes),
            CellValue::Percent(p) => format!("{:.1}%", p),
            CellValue::DateTime(dt) => {
                let local: DateTime<Local> = dt.with_timezone(&Local);
                local.format("%Y-%m-%dT%H:%M:%S").to_string()
            }
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Empty => String::new(),
        }
    }

    /// Display width of the content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Complete(_) | CellValue::Empty => 1,
            CellValue::DateTime(_) => 16,
            other => other.raw().chars().count(),
        }
    }
}

fn join_classes(classes: &[DriftClass]) -> String {
    classes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column definition with key, header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values; `id` is what `--format id` prints
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Renders rows in the tabular output formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows; Auto, Json and Yaml fall back to TSV
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        print!("{}", self.render(&rows, format));
    }

    /// Render rows to a string
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
            _ => self.render_tsv(rows),
        }
    }

    /// Natural width per column, capped at the column's defined width
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width.max(col.header.len()))
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = *w),
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found.\n",
                style(rows.len()).cyan(),
                self.entity_name
            ));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| {
                    row.get(col.key)
                        .map(CellValue::format_md)
                        .unwrap_or_else(|| "-".to_string())
                })
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }
}
