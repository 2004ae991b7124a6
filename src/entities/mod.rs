//! Record types for warehouse fulfillment
//!
//! - [`Order`] - a customer sales order, keyed by SO number
//! - [`Tool`] - one physical unit being built/fulfilled within an order
//! - [`LineItem`] - a required part, order-wide or scoped to some tools
//! - [`Pick`] - an append-only fulfillment event against a line item

pub mod line_item;
pub mod order;
pub mod pick;
pub mod tool;

pub use line_item::{LineItem, ToolScope};
pub use order::{Order, OrderStatus};
pub use pick::Pick;
pub use tool::{Tool, ToolStatus};
