//! Order - a customer sales order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
    OnHold,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::InProgress => write!(f, "in_progress"),
            OrderStatus::Complete => write!(f, "complete"),
            OrderStatus::OnHold => write!(f, "on_hold"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "in_progress" | "inprogress" => Ok(OrderStatus::InProgress),
            "complete" | "completed" => Ok(OrderStatus::Complete),
            "on_hold" | "onhold" => Ok(OrderStatus::OnHold),
            _ => Err(format!(
                "Invalid order status: {}. Use pending, in_progress, complete, or on_hold",
                s
            )),
        }
    }
}

/// Customer sales order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Sales-order number (unique key)
    pub so_number: String,

    pub customer_name: String,

    /// Model of tool being built for this order
    #[serde(default)]
    pub tool_model: String,

    /// Number of tools ordered
    #[serde(default)]
    pub quantity: u32,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    pub fn new(so_number: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            so_number: so_number.into(),
            customer_name: customer_name.into(),
            tool_model: String::new(),
            quantity: 0,
            status: OrderStatus::default(),
            created: Utc::now(),
            notes: None,
        }
    }

    pub fn with_tool_model(mut self, model: impl Into<String>, quantity: u32) -> Self {
        self.tool_model = model.into();
        self.quantity = quantity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_creation() {
        let order = Order::new("3930", "Acme Tooling").with_tool_model("PX-200", 2);
        assert_eq!(order.so_number, "3930");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!("in_progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Complete);
        assert_eq!("ONHOLD".parse::<OrderStatus>().unwrap(), OrderStatus::OnHold);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_deserialization_defaults() {
        let yaml = r#"
so_number: "3930"
customer_name: "Acme Tooling"
"#;
        let order: Order = serde_yml::from_str(yaml).unwrap();
        assert_eq!(order.so_number, "3930");
        assert_eq!(order.quantity, 0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.notes.is_none());
    }
}
