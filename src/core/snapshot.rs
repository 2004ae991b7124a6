//! Order snapshot - an order together with all of its child records
//!
//! The snapshot is what the store hands out and what the reconciliation
//! functions consume. It is plain data; nothing in here touches the disk.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::core::entity::{duplicate_ids, find_by_id};
use crate::entities::{LineItem, Order, Pick, Tool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order: Order,

    #[serde(default)]
    pub tools: Vec<Tool>,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    #[serde(default)]
    pub picks: Vec<Pick>,
}

/// Structural problems that make a snapshot unfit for import
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotIssue {
    #[error("tool number '{0}' is used by more than one tool")]
    DuplicateToolNumber(String),

    #[error("{kind} id '{id}' appears more than once")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} '{id}' belongs to order '{found}', not '{expected}'")]
    WrongOrder {
        kind: &'static str,
        id: String,
        found: String,
        expected: String,
    },

    #[error("pick '{pick}' references unknown line item '{line_item}'")]
    UnknownLineItem { pick: String, line_item: String },
}

impl OrderSnapshot {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            tools: Vec::new(),
            line_items: Vec::new(),
            picks: Vec::new(),
        }
    }

    pub fn so_number(&self) -> &str {
        &self.order.so_number
    }

    pub fn tool(&self, id: &str) -> Option<&Tool> {
        find_by_id(&self.tools, id)
    }

    /// Find a tool by tool number first, then by id
    pub fn find_tool(&self, number_or_id: &str) -> Option<&Tool> {
        self.tools
            .iter()
            .find(|t| t.tool_number == number_or_id)
            .or_else(|| self.tool(number_or_id))
    }

    pub fn line_item(&self, id: &str) -> Option<&LineItem> {
        find_by_id(&self.line_items, id)
    }

    pub fn pick(&self, id: &str) -> Option<&Pick> {
        find_by_id(&self.picks, id)
    }

    pub fn picks_for<'a>(&'a self, line_item_id: &'a str) -> impl Iterator<Item = &'a Pick> + 'a {
        self.picks.iter().filter(move |p| p.line_item_id == line_item_id)
    }

    /// Whether some later pick already reverses the given pick
    pub fn is_reversed(&self, pick_id: &str) -> bool {
        self.picks.iter().any(|p| p.undoes.as_deref() == Some(pick_id))
    }

    /// Check structural integrity; an empty result means the snapshot is sound
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();
        let so = self.so_number();

        let mut numbers = HashSet::new();
        for tool in &self.tools {
            if !numbers.insert(tool.tool_number.as_str()) {
                issues.push(SnapshotIssue::DuplicateToolNumber(tool.tool_number.clone()));
            }
        }

        for id in duplicate_ids(&self.tools) {
            issues.push(SnapshotIssue::DuplicateId { kind: "tool", id });
        }
        for id in duplicate_ids(&self.line_items) {
            issues.push(SnapshotIssue::DuplicateId { kind: "line item", id });
        }
        for id in duplicate_ids(&self.picks) {
            issues.push(SnapshotIssue::DuplicateId { kind: "pick", id });
        }

        for tool in self.tools.iter().filter(|t| t.order_id != so) {
            issues.push(SnapshotIssue::WrongOrder {
                kind: "tool",
                id: tool.id.clone(),
                found: tool.order_id.clone(),
                expected: so.to_string(),
            });
        }
        for li in self.line_items.iter().filter(|li| li.order_id != so) {
            issues.push(SnapshotIssue::WrongOrder {
                kind: "line item",
                id: li.id.clone(),
                found: li.order_id.clone(),
                expected: so.to_string(),
            });
        }

        for pick in &self.picks {
            if self.line_item(&pick.line_item_id).is_none() {
                issues.push(SnapshotIssue::UnknownLineItem {
                    pick: pick.id.clone(),
                    line_item: pick.line_item_id.clone(),
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> OrderSnapshot {
        let mut snap = OrderSnapshot::new(Order::new("3930", "Acme"));
        snap.tools.push(Tool::new("3930", "3930-1").with_id("t1"));
        snap.tools.push(Tool::new("3930", "3930-2").with_id("t2"));
        snap.line_items.push(LineItem::new("3930", "613279", 24).with_id("li-1"));
        snap.picks.push(Pick::new("li-1", "t1", 12, "Dana").with_id("p-1"));
        snap
    }

    #[test]
    fn test_find_tool_by_number_or_id() {
        let snap = snapshot();
        assert_eq!(snap.find_tool("3930-2").map(|t| t.id.as_str()), Some("t2"));
        assert_eq!(snap.find_tool("t1").map(|t| t.tool_number.as_str()), Some("3930-1"));
        assert!(snap.find_tool("3930-9").is_none());
    }

    #[test]
    fn test_valid_snapshot_has_no_issues() {
        assert!(snapshot().validate().is_empty());
    }

    #[test]
    fn test_validate_duplicate_tool_number() {
        let mut snap = snapshot();
        snap.tools.push(Tool::new("3930", "3930-1").with_id("t3"));
        assert_eq!(
            snap.validate(),
            vec![SnapshotIssue::DuplicateToolNumber("3930-1".to_string())]
        );
    }

    #[test]
    fn test_validate_unknown_line_item_and_wrong_order() {
        let mut snap = snapshot();
        snap.picks.push(Pick::new("li-gone", "t1", 1, "Dana").with_id("p-2"));
        snap.line_items.push(LineItem::new("4000", "613278", 6).with_id("li-2"));
        let issues = snap.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .any(|i| matches!(i, SnapshotIssue::UnknownLineItem { pick, .. } if pick == "p-2")));
        assert!(issues
            .iter()
            .any(|i| matches!(i, SnapshotIssue::WrongOrder { id, .. } if id == "li-2")));
    }

    #[test]
    fn test_is_reversed() {
        let mut snap = snapshot();
        assert!(!snap.is_reversed("p-1"));
        let undo = snap.picks[0].reversal("Sam");
        snap.picks.push(undo);
        assert!(snap.is_reversed("p-1"));
    }
}
