use serde::Serialize;
use std::fmt;

use crate::core::OrderSnapshot;
use crate::entities::{LineItem, Tool, ToolScope};

/// Resolve the tools a line item applies to
///
/// No `tool_ids` (or an empty list) means every tool in the order. Otherwise
/// only tools whose id is listed are returned, in the order of `tools`; ids
/// that match no tool are dropped (see [`stale_tool_refs`]).
pub fn resolve_applicable_tools<'a>(line_item: &LineItem, tools: &'a [Tool]) -> Vec<&'a Tool> {
    match line_item.scope() {
        ToolScope::OrderWide => tools.iter().collect(),
        ToolScope::Tools(ids) => tools
            .iter()
            .filter(|t| ids.iter().any(|id| *id == t.id))
            .collect(),
    }
}

/// Tool ids referenced by a line item that no longer exist in the order
pub fn stale_tool_refs<'a>(line_item: &'a LineItem, tools: &[Tool]) -> Vec<&'a str> {
    match line_item.scope() {
        ToolScope::OrderWide => Vec::new(),
        ToolScope::Tools(ids) => ids
            .iter()
            .filter(|id| !tools.iter().any(|t| t.id == **id))
            .map(String::as_str)
            .collect(),
    }
}

/// Display label for a tool reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ToolLabel {
    /// Resolved to a tool number
    Known(String),
    /// Id not present in the order; shown as the raw id
    Missing(String),
}

impl ToolLabel {
    pub fn is_missing(&self) -> bool {
        matches!(self, ToolLabel::Missing(_))
    }
}

impl fmt::Display for ToolLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolLabel::Known(number) => write!(f, "{}", number),
            ToolLabel::Missing(raw) => write!(f, "{}", raw),
        }
    }
}

/// Labels for the tools a line item applies to, falling back to raw ids
pub fn tool_labels(line_item: &LineItem, tools: &[Tool]) -> Vec<ToolLabel> {
    match line_item.scope() {
        ToolScope::OrderWide => tools
            .iter()
            .map(|t| ToolLabel::Known(t.tool_number.clone()))
            .collect(),
        ToolScope::Tools(ids) => ids
            .iter()
            .map(|id| match tools.iter().find(|t| t.id == *id) {
                Some(tool) => ToolLabel::Known(tool.tool_number.clone()),
                None => ToolLabel::Missing(id.clone()),
            })
            .collect(),
    }
}

/// One line item as seen from a single tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolLineProgress {
    pub line_item_id: String,
    pub part_number: String,
    /// `qty_per_unit` of the line item
    pub needed: i64,
    /// Picks recorded for this tool against this line item
    pub picked: i64,
    pub remaining: i64,
    pub is_complete: bool,
}

/// Pick progress for one tool across the line items that apply to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolProgress {
    pub tool_id: String,
    pub tool_number: String,
    pub lines: Vec<ToolLineProgress>,
}

impl ToolProgress {
    pub fn lines_complete(&self) -> usize {
        self.lines.iter().filter(|l| l.is_complete).count()
    }

    pub fn is_complete(&self) -> bool {
        self.lines.iter().all(|l| l.is_complete)
    }
}

/// Per-tool progress for every tool in the order
pub fn tool_progress(snapshot: &OrderSnapshot) -> Vec<ToolProgress> {
    snapshot
        .tools
        .iter()
        .map(|tool| {
            let lines = snapshot
                .line_items
                .iter()
                .filter(|li| li.applies_to(&tool.id))
                .map(|li| {
                    let picked: i64 = snapshot
                        .picks_for(&li.id)
                        .filter(|p| p.tool_id == tool.id)
                        .map(|p| p.qty_picked)
                        .sum();
                    let remaining = li.qty_per_unit - picked;
                    ToolLineProgress {
                        line_item_id: li.id.clone(),
                        part_number: li.part_number.clone(),
                        needed: li.qty_per_unit,
                        picked,
                        remaining,
                        is_complete: remaining <= 0,
                    }
                })
                .collect();

            ToolProgress {
                tool_id: tool.id.clone(),
                tool_number: tool.tool_number.clone(),
                lines,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::order_3930;
    use std::collections::HashSet;

    fn ids(tools: &[&Tool]) -> HashSet<String> {
        tools.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_null_tool_ids_resolve_to_all_tools() {
        let snap = order_3930();
        let li = snap.line_item("li-279").unwrap();
        assert!(li.tool_ids.is_none());
        assert_eq!(resolve_applicable_tools(li, &snap.tools).len(), 2);
    }

    #[test]
    fn test_empty_tool_ids_resolve_to_all_tools() {
        let snap = order_3930();
        let li = LineItem::new("3930", "613280", 2).with_tools(Vec::<String>::new());
        let resolved = resolve_applicable_tools(&li, &snap.tools);
        assert_eq!(ids(&resolved), ids(&snap.tools.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn test_listed_tool_ids_resolve_exactly() {
        let mut snap = order_3930();
        snap.tools.push(Tool::new("3930", "3930-3").with_id("t3"));
        let li = LineItem::new("3930", "613280", 2).with_tools(["t3", "t1"]);
        let resolved = resolve_applicable_tools(&li, &snap.tools);
        assert_eq!(ids(&resolved), HashSet::from(["t1".to_string(), "t3".to_string()]));
    }

    #[test]
    fn test_deleted_tool_reference_resolves_empty_and_labels_raw_id() {
        let snap = order_3930();
        let li = LineItem::new("3930", "613280", 2).with_tools(["id_of_deleted_tool"]);

        assert!(resolve_applicable_tools(&li, &snap.tools).is_empty());
        assert_eq!(stale_tool_refs(&li, &snap.tools), vec!["id_of_deleted_tool"]);

        let labels = tool_labels(&li, &snap.tools);
        assert_eq!(labels, vec![ToolLabel::Missing("id_of_deleted_tool".to_string())]);
        assert_eq!(labels[0].to_string(), "id_of_deleted_tool");
    }

    #[test]
    fn test_labels_mix_known_and_missing() {
        let snap = order_3930();
        let li = LineItem::new("3930", "613280", 2).with_tools(["t2", "gone"]);
        let labels = tool_labels(&li, &snap.tools);
        assert_eq!(
            labels,
            vec![
                ToolLabel::Known("3930-2".to_string()),
                ToolLabel::Missing("gone".to_string())
            ]
        );
        assert!(!labels[0].is_missing());
        assert!(labels[1].is_missing());
    }

    #[test]
    fn test_tool_progress() {
        let progress = tool_progress(&order_3930());
        assert_eq!(progress.len(), 2);

        let t1 = &progress[0];
        assert_eq!(t1.tool_number, "3930-1");
        // 613279 (order-wide) and 613278 split item scoped to t1
        assert_eq!(t1.lines.len(), 2);
        assert!(t1.is_complete());

        let t2 = &progress[1];
        assert_eq!(t2.lines.len(), 2);
        assert_eq!(t2.lines_complete(), 1);
        let scoped = t2.lines.iter().find(|l| l.line_item_id == "li-278b").unwrap();
        assert_eq!(scoped.needed, 4);
        assert_eq!(scoped.picked, 0);
        assert_eq!(scoped.remaining, 4);
    }

    #[test]
    fn test_tool_progress_empty_order() {
        let mut snap = order_3930();
        snap.tools.clear();
        assert!(tool_progress(&snap).is_empty());
    }
}
