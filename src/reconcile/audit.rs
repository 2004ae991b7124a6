use serde::Serialize;
use std::fmt;

use crate::core::{ExpectedTotals, OrderSnapshot};
use crate::reconcile::drift::{detect_drift, DriftClass};
use crate::reconcile::parts::aggregate_by_part;
use crate::reconcile::status::line_item_statuses;
use crate::reconcile::tools::stale_tool_refs;

/// A data-quality finding; never an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    SplitPart {
        part_number: String,
        line_item_count: usize,
    },
    WrongTotal {
        part_number: String,
        db_total: i64,
        expected_total: i64,
    },
    OverPicked {
        line_item_id: String,
        part_number: String,
        over_by: i64,
    },
    StaleToolRef {
        line_item_id: String,
        tool_id: String,
    },
    /// Pick whose line item is gone from the order
    OrphanPick {
        pick_id: String,
        line_item_id: String,
    },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::SplitPart { .. } => "split_part",
            Warning::WrongTotal { .. } => "wrong_total",
            Warning::OverPicked { .. } => "over_picked",
            Warning::StaleToolRef { .. } => "stale_tool_ref",
            Warning::OrphanPick { .. } => "orphan_pick",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SplitPart {
                part_number,
                line_item_count,
            } => write!(f, "part {} is split across {} line items", part_number, line_item_count),
            Warning::WrongTotal {
                part_number,
                db_total,
                expected_total,
            } => write!(
                f,
                "part {} totals {} but {} was expected",
                part_number, db_total, expected_total
            ),
            Warning::OverPicked {
                line_item_id,
                part_number,
                over_by,
            } => write!(
                f,
                "line item {} (part {}) is over-picked by {}",
                line_item_id, part_number, over_by
            ),
            Warning::StaleToolRef {
                line_item_id,
                tool_id,
            } => write!(
                f,
                "line item {} references missing tool {}",
                line_item_id, tool_id
            ),
            Warning::OrphanPick {
                pick_id,
                line_item_id,
            } => write!(
                f,
                "pick {} references missing line item {}",
                pick_id, line_item_id
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub so_number: String,
    pub warnings: Vec<Warning>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }
}

/// Collect every data-quality warning for an order
///
/// Totals are only checked when `expected` is supplied.
pub fn audit(snapshot: &OrderSnapshot, expected: Option<&ExpectedTotals>) -> AuditReport {
    let mut warnings = Vec::new();

    for part in aggregate_by_part(snapshot, None).iter().filter(|p| p.is_split()) {
        warnings.push(Warning::SplitPart {
            part_number: part.part_number.clone(),
            line_item_count: part.line_item_count,
        });
    }

    if let Some(expected) = expected {
        let drift = detect_drift(snapshot, expected);
        for entry in drift.entries.iter().filter(|e| e.has(DriftClass::WrongTotal)) {
            if let Some(expected_total) = entry.expected_total {
                warnings.push(Warning::WrongTotal {
                    part_number: entry.part_number.clone(),
                    db_total: entry.db_total,
                    expected_total,
                });
            }
        }
    }

    for status in line_item_statuses(snapshot).iter().filter(|s| s.is_over_picked()) {
        warnings.push(Warning::OverPicked {
            line_item_id: status.line_item_id.clone(),
            part_number: status.part_number.clone(),
            over_by: -status.remaining,
        });
    }

    for li in &snapshot.line_items {
        for tool_id in stale_tool_refs(li, &snapshot.tools) {
            warnings.push(Warning::StaleToolRef {
                line_item_id: li.id.clone(),
                tool_id: tool_id.to_string(),
            });
        }
    }

    for pick in &snapshot.picks {
        if snapshot.line_item(&pick.line_item_id).is_none() {
            warnings.push(Warning::OrphanPick {
                pick_id: pick.id.clone(),
                line_item_id: pick.line_item_id.clone(),
            });
        }
    }

    AuditReport {
        so_number: snapshot.so_number().to_string(),
        warnings,
    }
}

/// Order-level rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub so_number: String,
    pub tools: usize,
    pub line_items: usize,
    pub complete: usize,
    pub over_picked: usize,
    pub split_parts: usize,
    pub stale_refs: usize,
    pub total_needed: i64,
    pub total_picked: i64,
    /// Share of complete line items, 0-100
    pub percent_complete: f64,
}

pub fn order_summary(snapshot: &OrderSnapshot) -> OrderSummary {
    let statuses = line_item_statuses(snapshot);
    let complete = statuses.iter().filter(|s| s.is_complete).count();
    let percent_complete = if statuses.is_empty() {
        0.0
    } else {
        complete as f64 * 100.0 / statuses.len() as f64
    };

    OrderSummary {
        so_number: snapshot.so_number().to_string(),
        tools: snapshot.tools.len(),
        line_items: statuses.len(),
        complete,
        over_picked: statuses.iter().filter(|s| s.is_over_picked()).count(),
        split_parts: aggregate_by_part(snapshot, None)
            .iter()
            .filter(|p| p.is_split())
            .count(),
        stale_refs: snapshot
            .line_items
            .iter()
            .map(|li| stale_tool_refs(li, &snapshot.tools).len())
            .sum(),
        total_needed: statuses.iter().map(|s| s.total_needed).sum(),
        total_picked: statuses.iter().map(|s| s.total_picked).sum(),
        percent_complete,
    }
}

/// An order left behind by a failed import: no tools and no picks yet
pub fn is_partially_created(snapshot: &OrderSnapshot) -> bool {
    snapshot.tools.is_empty() && snapshot.picks.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LineItem, Order, Pick};
    use crate::reconcile::fixtures::order_3930;

    #[test]
    fn test_audit_flags_split_part() {
        let report = audit(&order_3930(), None);
        assert_eq!(
            report.warnings,
            vec![Warning::SplitPart {
                part_number: "613278".to_string(),
                line_item_count: 2
            }]
        );
        assert_eq!(report.count("split_part"), 1);
    }

    #[test]
    fn test_audit_with_expected_adds_wrong_total() {
        let expected: ExpectedTotals = [("613278", 6)].into_iter().collect();
        let report = audit(&order_3930(), Some(&expected));
        assert_eq!(report.count("wrong_total"), 1);
        assert_eq!(report.count("split_part"), 1);
    }

    #[test]
    fn test_audit_over_pick_stale_ref_and_orphan() {
        let mut snap = order_3930();
        snap.picks.push(Pick::new("li-279", "t1", 2, "Dana"));
        snap.line_items
            .push(LineItem::new("3930", "613300", 1).with_tools(["gone"]).with_id("li-300"));
        snap.picks.push(Pick::new("li-deleted", "t1", 1, "Dana").with_id("p-orphan"));

        let report = audit(&snap, None);
        assert!(report.warnings.contains(&Warning::OverPicked {
            line_item_id: "li-279".to_string(),
            part_number: "613279".to_string(),
            over_by: 2,
        }));
        assert!(report.warnings.contains(&Warning::StaleToolRef {
            line_item_id: "li-300".to_string(),
            tool_id: "gone".to_string(),
        }));
        assert!(report.warnings.contains(&Warning::OrphanPick {
            pick_id: "p-orphan".to_string(),
            line_item_id: "li-deleted".to_string(),
        }));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_clean_order() {
        let mut snap = OrderSnapshot::new(Order::new("5000", "Acme"));
        snap.line_items.push(LineItem::new("5000", "P-1", 2).with_id("li"));
        assert!(audit(&snap, None).is_clean());
    }

    #[test]
    fn test_order_summary() {
        let summary = order_summary(&order_3930());
        assert_eq!(summary.tools, 2);
        assert_eq!(summary.line_items, 3);
        assert_eq!(summary.complete, 2);
        assert_eq!(summary.over_picked, 0);
        assert_eq!(summary.split_parts, 1);
        assert_eq!(summary.stale_refs, 0);
        assert_eq!(summary.total_needed, 34);
        assert_eq!(summary.total_picked, 30);
        assert!((summary.percent_complete - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_empty_order_summary_is_zero() {
        let summary = order_summary(&OrderSnapshot::new(Order::new("5000", "Nobody")));
        assert_eq!(summary.line_items, 0);
        assert_eq!(summary.percent_complete, 0.0);
    }

    #[test]
    fn test_partially_created() {
        let mut snap = OrderSnapshot::new(Order::new("5000", "Acme"));
        snap.line_items.push(LineItem::new("5000", "P-1", 2));
        assert!(is_partially_created(&snap));
        assert!(!is_partially_created(&order_3930()));
    }

    #[test]
    fn test_warning_display() {
        let w = Warning::StaleToolRef {
            line_item_id: "li-300".to_string(),
            tool_id: "gone".to_string(),
        };
        assert_eq!(w.to_string(), "line item li-300 references missing tool gone");
    }
}
