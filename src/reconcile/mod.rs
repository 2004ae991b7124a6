//! Fulfillment reconciliation
//!
//! Pure, synchronous functions over an [`OrderSnapshot`]: how much each line
//! item needs, how much has been picked, which tools it applies to, and
//! where the data has drifted (split line items, totals that disagree with
//! an expected source, stale tool references, over-picks).
//!
//! Nothing here performs I/O or fails. Conditions like an over-pick or a
//! split part are part of the output, not errors.
//!
//! [`OrderSnapshot`]: crate::core::OrderSnapshot

mod audit;
mod drift;
mod parts;
mod status;
mod tools;

pub use audit::{audit, is_partially_created, order_summary, AuditReport, OrderSummary, Warning};
pub use drift::{detect_drift, DriftClass, DriftEntry, DriftReport};
pub use parts::{aggregate_by_part, PartAggregate};
pub use status::{compute_line_item_status, line_item_statuses, LineItemStatus};
pub use tools::{
    resolve_applicable_tools, stale_tool_refs, tool_labels, tool_progress, ToolLabel,
    ToolLineProgress, ToolProgress,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::OrderSnapshot;
    use crate::entities::{LineItem, Order, Pick, Tool};

    /// Order 3930: two tools, one order-wide part and a split, tool-scoped part
    pub fn order_3930() -> OrderSnapshot {
        let mut snap = OrderSnapshot::new(Order::new("3930", "Acme Tooling").with_tool_model("PX-200", 2));
        snap.tools = vec![
            Tool::new("3930", "3930-1").with_id("t1"),
            Tool::new("3930", "3930-2").with_id("t2"),
        ];
        snap.line_items = vec![
            LineItem::new("3930", "613279", 24)
                .with_qty_per_unit(12)
                .with_id("li-279"),
            LineItem::new("3930", "613278", 6)
                .with_qty_per_unit(6)
                .with_tools(["t1"])
                .with_id("li-278a"),
            LineItem::new("3930", "613278", 4)
                .with_qty_per_unit(4)
                .with_tools(["t2"])
                .with_id("li-278b"),
        ];
        snap.picks = vec![
            Pick::new("li-279", "t1", 12, "Dana").with_id("p1"),
            Pick::new("li-279", "t2", 12, "Dana").with_id("p2"),
            Pick::new("li-278a", "t1", 6, "Sam").with_id("p3"),
        ];
        snap
    }
}
