//! Tool - one physical unit within an order

use serde::{Deserialize, Serialize};

use crate::core::entity::Record;
use crate::core::identity::{RecordId, RecordPrefix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ToolStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolStatus::Pending => write!(f, "pending"),
            ToolStatus::InProgress => write!(f, "in_progress"),
            ToolStatus::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,

    /// SO number of the owning order
    pub order_id: String,

    /// Tool number, unique within the order (e.g. "3930-1")
    pub tool_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_model: Option<String>,

    #[serde(default)]
    pub status: ToolStatus,
}

impl Tool {
    pub fn new(order_id: impl Into<String>, tool_number: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Tool).to_string(),
            order_id: order_id.into(),
            tool_number: tool_number.into(),
            tool_model: None,
            status: ToolStatus::default(),
        }
    }

    /// Builder for fixtures and imports that already know the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Record for Tool {
    const KIND: &'static str = "tool";

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
    fn test_tool_creation() {
        let tool = Tool::new("3930", "3930-1");
        assert!(tool.id.starts_with("TOOL-"));
        assert_eq!(tool.tool_number, "3930-1");
        assert_eq!(tool.status, ToolStatus::Pending);
    }

    #[test]
    fn test_tool_with_id() {
        let tool = Tool::new("3930", "3930-2").with_id("t2");
        assert_eq!(tool.id(), "t2");
        assert_eq!(tool.order_id(), Some("3930"));
    }
}
