//! Pick - an append-only fulfillment event
//!
//! Picks are never edited. Reversing one appends a new pick with the negated
//! quantity and `undoes` pointing at the original.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::{RecordId, RecordPrefix};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub id: String,

    pub line_item_id: String,

    /// Tool the quantity was picked for
    pub tool_id: String,

    /// Quantity picked; negative for a reversal
    pub qty_picked: i64,

    pub picked_by: String,

    pub picked_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Id of the pick this one reverses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undoes: Option<String>,
}

impl Pick {
    pub fn new(
        line_item_id: impl Into<String>,
        tool_id: impl Into<String>,
        qty_picked: i64,
        picked_by: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Pick).to_string(),
            line_item_id: line_item_id.into(),
            tool_id: tool_id.into(),
            qty_picked,
            picked_by: picked_by.into(),
            picked_at: Utc::now(),
            notes: None,
            undoes: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_reversal(&self) -> bool {
        self.undoes.is_some()
    }

    /// Build the pick that reverses this one
    pub fn reversal(&self, picked_by: impl Into<String>) -> Pick {
        Pick {
            id: RecordId::new(RecordPrefix::Pick).to_string(),
            line_item_id: self.line_item_id.clone(),
            tool_id: self.tool_id.clone(),
            qty_picked: -self.qty_picked,
            picked_by: picked_by.into(),
            picked_at: Utc::now(),
            notes: None,
            undoes: Some(self.id.clone()),
        }
    }
}

impl Record for Pick {
    const KIND: &'static str = "pick";

    fn id(&self) -> &str {
        &self.id
    }

    fn order_id(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_creation() {
        let pick = Pick::new("li-1", "t1", 3, "Dana");
        assert!(pick.id.starts_with("PICK-"));
        assert!(!pick.is_reversal());
    }

    #[test]
    fn test_reversal_negates_quantity() {
        let pick = Pick::new("li-1", "t1", 3, "Dana");
        let undo = pick.reversal("Sam");
        assert_eq!(undo.qty_picked, -3);
        assert_eq!(undo.undoes.as_deref(), Some(pick.id.as_str()));
        assert_eq!(undo.line_item_id, "li-1");
        assert_eq!(undo.tool_id, "t1");
        assert_ne!(undo.id, pick.id);
        assert!(undo.is_reversal());
    }

    #[test]
    fn test_pick_deserialization() {
        let yaml = r#"
id: p-1
line_item_id: li-1
tool_id: t1
qty_picked: 12
picked_by: Dana
picked_at: 2024-03-01T14:30:00Z
"#;
        let pick: Pick = serde_yml::from_str(yaml).unwrap();
        assert_eq!(pick.qty_picked, 12);
        assert!(pick.undoes.is_none());
    }
}
