//! LineItem - a required part within an order
//!
//! A line item either applies to every tool in the order (no `tool_ids`, or
//! an empty list) or only to the tools it names. Several line items may exist
//! for the same part number in one order; those "split" items are a data
//! quality defect that the reconciliation reports surface.

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::{RecordId, RecordPrefix};

/// Which tools a line item applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolScope<'a> {
    /// Applies to every tool in the order
    OrderWide,
    /// Applies only to the listed tool ids
    Tools(&'a [String]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,

    /// SO number of the owning order
    pub order_id: String,

    pub part_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity needed for each tool the item applies to
    #[serde(default)]
    pub qty_per_unit: i64,

    /// Quantity needed across the whole order
    #[serde(default)]
    pub total_qty_needed: i64,

    #[serde(default)]
    pub qty_available: i64,

    #[serde(default)]
    pub qty_on_order: i64,

    /// Tools this item applies to; null or empty means all tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_ids: Option<Vec<String>>,
}

impl LineItem {
    pub fn new(order_id: impl Into<String>, part_number: impl Into<String>, total_qty_needed: i64) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Li).to_string(),
            order_id: order_id.into(),
            part_number: part_number.into(),
            description: None,
            qty_per_unit: 0,
            total_qty_needed,
            qty_available: 0,
            qty_on_order: 0,
            tool_ids: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_qty_per_unit(mut self, qty: i64) -> Self {
        self.qty_per_unit = qty;
        self
    }

    pub fn with_tools<I, S>(mut self, tool_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_ids = Some(tool_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn scope(&self) -> ToolScope<'_> {
        match self.tool_ids.as_deref() {
            None | Some([]) => ToolScope::OrderWide,
            Some(ids) => ToolScope::Tools(ids),
        }
    }

    pub fn is_order_wide(&self) -> bool {
        self.scope() == ToolScope::OrderWide
    }

    /// Whether this item applies to the given tool id
    pub fn applies_to(&self, tool_id: &str) -> bool {
        match self.scope() {
            ToolScope::OrderWide => true,
            ToolScope::Tools(ids) => ids.iter().any(|id| id == tool_id),
        }
    }

    /// Shortfall against stock on hand and on order (never negative)
    pub fn shortage(&self) -> i64 {
        (self.total_qty_needed - self.qty_available - self.qty_on_order).max(0)
    }
}

impl Record for LineItem {
    const KIND: &'static str = "line item";

    fn id(&self) -> &str {
        &self.id
    }

    fn order_id(&self) -> Option<&str> {
        Some(&self.order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_creation() {
        let li = LineItem::new("3930", "613279", 24);
        assert!(li.id.starts_with("LI-"));
        assert_eq!(li.total_qty_needed, 24);
        assert!(li.is_order_wide());
    }

    #[test]
    fn test_empty_tool_ids_is_order_wide() {
        let li = LineItem::new("3930", "613279", 24).with_tools(Vec::<String>::new());
        assert_eq!(li.scope(), ToolScope::OrderWide);
        assert!(li.applies_to("anything"));
    }

    #[test]
    fn test_scoped_applies_to() {
        let li = LineItem::new("3930", "613278", 6).with_tools(["t1", "t2"]);
        assert!(!li.is_order_wide());
        assert!(li.applies_to("t1"));
        assert!(!li.applies_to("t3"));
    }

    #[test]
    fn test_shortage() {
        let mut li = LineItem::new("3930", "613278", 10);
        li.qty_available = 4;
        li.qty_on_order = 2;
        assert_eq!(li.shortage(), 4);
        li.qty_on_order = 20;
        assert_eq!(li.shortage(), 0);
    }

    #[test]
    fn test_null_tool_ids_deserialize() {
        let yaml = r#"
id: li-1
order_id: "3930"
part_number: "613279"
total_qty_needed: 24
tool_ids: null
"#;
        let li: LineItem = serde_yml::from_str(yaml).unwrap();
        assert!(li.tool_ids.is_none());
        assert!(li.is_order_wide());
    }
}
