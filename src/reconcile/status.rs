use serde::Serialize;

use crate::core::OrderSnapshot;
use crate::entities::{LineItem, Pick};

/// Needed vs picked for one line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemStatus {
    pub line_item_id: String,
    pub part_number: String,
    pub total_needed: i64,
    pub total_picked: i64,
    /// `total_needed - total_picked`; negative when over-picked
    pub remaining: i64,
    pub is_complete: bool,
}

impl LineItemStatus {
    pub fn is_over_picked(&self) -> bool {
        self.remaining < 0
    }
}

/// Sum the picks that belong to `line_item`; picks for other items are ignored
pub fn compute_line_item_status(line_item: &LineItem, picks: &[Pick]) -> LineItemStatus {
    let total_picked: i64 = picks
        .iter()
        .filter(|p| p.line_item_id == line_item.id)
        .map(|p| p.qty_picked)
        .sum();
    let total_needed = line_item.total_qty_needed;
    let remaining = total_needed - total_picked;

    LineItemStatus {
        line_item_id: line_item.id.clone(),
        part_number: line_item.part_number.clone(),
        total_needed,
        total_picked,
        remaining,
        is_complete: remaining <= 0,
    }
}

/// Status of every line item in the order, in snapshot order
pub fn line_item_statuses(snapshot: &OrderSnapshot) -> Vec<LineItemStatus> {
    snapshot
        .line_items
        .iter()
        .map(|li| compute_line_item_status(li, &snapshot.picks))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::fixtures::order_3930;

    #[test]
    fn test_remaining_is_needed_minus_picked() {
        let li = LineItem::new("3930", "613278", 10).with_id("li");
        for picked in [0, 3, 10, 13] {
            let picks = vec![Pick::new("li", "t1", picked, "Dana")];
            let status = compute_line_item_status(&li, &picks);
            assert_eq!(status.remaining, 10 - picked);
            assert_eq!(status.is_complete, 10 - picked <= 0);
        }
    }

    #[test]
    fn test_no_picks_means_zero_picked() {
        let li = LineItem::new("3930", "613278", 6).with_id("li");
        let status = compute_line_item_status(&li, &[]);
        assert_eq!(status.total_picked, 0);
        assert_eq!(status.remaining, 6);
        assert!(!status.is_complete);
    }

    #[test]
    fn test_order_3930_part_613279_complete() {
        let snap = order_3930();
        let li = snap.line_item("li-279").unwrap();
        let status = compute_line_item_status(li, &snap.picks);
        assert_eq!(status.total_needed, 24);
        assert_eq!(status.total_picked, 24);
        assert_eq!(status.remaining, 0);
        assert!(status.is_complete);
        assert!(!status.is_over_picked());
    }

    #[test]
    fn test_over_pick_is_reported_not_clamped() {
        let li = LineItem::new("3930", "613278", 6).with_id("li");
        let picks = vec![
            Pick::new("li", "t1", 4, "Dana"),
            Pick::new("li", "t1", 5, "Dana"),
        ];
        let status = compute_line_item_status(&li, &picks);
        assert_eq!(status.remaining, -3);
        assert!(status.is_complete);
        assert!(status.is_over_picked());
    }

    #[test]
    fn test_undo_restores_remaining() {
        let li = LineItem::new("3930", "613278", 6).with_id("li");
        let first = Pick::new("li", "t1", 2, "Dana");
        let second = Pick::new("li", "t1", 3, "Dana");
        let before = compute_line_item_status(&li, &[first.clone()]);

        let undo = second.reversal("Dana");
        let after = compute_line_item_status(&li, &[first, second, undo]);
        assert_eq!(after.remaining, before.remaining);
    }

    #[test]
    fn test_statuses_follow_snapshot_order() {
        let statuses = line_item_statuses(&order_3930());
        let ids: Vec<_> = statuses.iter().map(|s| s.line_item_id.as_str()).collect();
        assert_eq!(ids, vec!["li-279", "li-278a", "li-278b"]);
        assert_eq!(statuses[2].total_picked, 0);
    }
}
