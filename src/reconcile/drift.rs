use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::core::{ExpectedTotals, OrderSnapshot};
use crate::reconcile::parts::aggregate_by_part;

/// Drift classification for one part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftClass {
    Ok,
    /// Database total differs from the expected total
    WrongTotal,
    /// Part still has more than one line item
    StillSplit,
}

impl fmt::Display for DriftClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriftClass::Ok => write!(f, "OK"),
            DriftClass::WrongTotal => write!(f, "WRONG_TOTAL"),
            DriftClass::StillSplit => write!(f, "STILL_SPLIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftEntry {
    pub part_number: String,
    /// Sum of `total_qty_needed` over the part's line items (0 if none)
    pub db_total: i64,
    pub expected_total: Option<i64>,
    pub line_item_count: usize,
    /// `[Ok]`, or any of `WrongTotal` / `StillSplit`
    pub classes: Vec<DriftClass>,
}

impl DriftEntry {
    pub fn is_ok(&self) -> bool {
        self.classes == [DriftClass::Ok]
    }

    pub fn has(&self, class: DriftClass) -> bool {
        self.classes.contains(&class)
    }

    /// Expected minus database total, when an expectation exists
    pub fn delta(&self) -> Option<i64> {
        self.expected_total.map(|e| e - self.db_total)
    }
}

impl fmt::Display for DriftEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self
            .expected_total
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        let classes: Vec<String> = self.classes.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "{}: db {}, expected {}, {} line item(s) [{}]",
            self.part_number,
            self.db_total,
            expected,
            self.line_item_count,
            classes.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub so_number: String,
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        self.entries.iter().any(|e| !e.is_ok())
    }

    pub fn count(&self, class: DriftClass) -> usize {
        self.entries.iter().filter(|e| e.has(class)).count()
    }

    pub fn entry(&self, part_number: &str) -> Option<&DriftEntry> {
        self.entries.iter().find(|e| e.part_number == part_number)
    }
}

/// Compare database part totals with expected totals
///
/// Covers every part in either source. A part only known to the expected
/// source has a database total of 0; a part with no expectation can only be
/// flagged as split.
pub fn detect_drift(snapshot: &OrderSnapshot, expected: &ExpectedTotals) -> DriftReport {
    let aggregates = aggregate_by_part(snapshot, Some(expected));

    let part_numbers: BTreeSet<&str> = aggregates
        .iter()
        .map(|a| a.part_number.as_str())
        .chain(expected.parts())
        .collect();

    let entries = part_numbers
        .into_iter()
        .map(|part| {
            let aggregate = aggregates.iter().find(|a| a.part_number == part);
            let db_total = aggregate.map_or(0, |a| a.total_needed);
            let line_item_count = aggregate.map_or(0, |a| a.line_item_count);
            let expected_total = expected.get(part);

            let mut classes = Vec::new();
            if expected_total.is_some_and(|e| e != db_total) {
                classes.push(DriftClass::WrongTotal);
            }
            if line_item_count > 1 {
                classes.push(DriftClass::StillSplit);
            }
            if classes.is_empty() {
                classes.push(DriftClass::Ok);
            }

            DriftEntry {
                part_number: part.to_string(),
                db_total,
                expected_total,
                line_item_count,
                classes,
            }
        })
        .collect();

    DriftReport {
        so_number: snapshot.so_number().to_string(),
        entries,
    }
}
