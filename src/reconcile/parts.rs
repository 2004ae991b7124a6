use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{ExpectedTotals, OrderSnapshot};

/// Combined totals for every line item sharing a part number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartAggregate {
    pub part_number: String,
    pub line_item_count: usize,
    pub line_item_ids: Vec<String>,
    pub total_needed: i64,
    pub total_picked: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_total: Option<i64>,
}

impl PartAggregate {
    /// More than one line item for the same part in one order
    pub fn is_split(&self) -> bool {
        self.line_item_count > 1
    }

    pub fn remaining(&self) -> i64 {
        self.total_needed - self.total_picked
    }

    /// `None` when no expected total was supplied for this part
    pub fn matches_expected(&self) -> Option<bool> {
        self.expected_total.map(|e| e == self.total_needed)
    }
}

/// Group line items by part number, sorted by part number
pub fn aggregate_by_part(
    snapshot: &OrderSnapshot,
    expected: Option<&ExpectedTotals>,
) -> Vec<PartAggregate> {
    let mut parts: BTreeMap<&str, PartAggregate> = BTreeMap::new();

    for li in &snapshot.line_items {
        let picked: i64 = snapshot.picks_for(&li.id).map(|p| p.qty_picked).sum();
        let entry = parts
            .entry(li.part_number.as_str())
            .or_insert_with(|| PartAggregate {
                part_number: li.part_number.clone(),
                line_item_count: 0,
                line_item_ids: Vec::new(),
                total_needed: 0,
                total_picked: 0,
                expected_total: expected.and_then(|e| e.get(&li.part_number)),
            });
        entry.line_item_count += 1;
        entry.line_item_ids.push(li.id.clone());
        entry.total_needed += li.total_qty_needed;
        entry.total_picked += picked;
    }

    parts.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LineItem, Order};
    use crate::reconcile::fixtures::order_3930;

    #[test]
    fn test_split_part_totals_combine() {
        let parts = aggregate_by_part(&order_3930(), None);
        assert_eq!(parts.len(), 2);

        let split = &parts[0];
        assert_eq!(split.part_number, "613278");
        assert_eq!(split.total_needed, 10);
        assert_eq!(split.line_item_count, 2);
        assert!(split.is_split());
        assert_eq!(split.total_picked, 6);
        assert_eq!(split.remaining(), 4);
        assert_eq!(split.matches_expected(), None);

        let single = &parts[1];
        assert_eq!(single.part_number, "613279");
        assert!(!single.is_split());
        assert_eq!(single.total_picked, 24);
    }

    #[test]
    fn test_compares_against_expected() {
        let expected: ExpectedTotals = [("613278", 6), ("613279", 24)].into_iter().collect();
        let parts = aggregate_by_part(&order_3930(), Some(&expected));
        assert_eq!(parts[0].expected_total, Some(6));
        assert_eq!(parts[0].matches_expected(), Some(false));
        assert_eq!(parts[1].matches_expected(), Some(true));
    }

    #[test]
    fn test_empty_order_has_no_parts() {
        let snap = OrderSnapshot::new(Order::new("5000", "Nobody"));
        assert!(aggregate_by_part(&snap, None).is_empty());
    }

    #[test]
    fn test_six_and_four_make_ten() {
        let mut snap = OrderSnapshot::new(Order::new("5000", "Acme"));
        snap.line_items.push(LineItem::new("5000", "P-1", 6));
        snap.line_items.push(LineItem::new("5000", "P-1", 4));
        let parts = aggregate_by_part(&snap, None);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].total_needed, 10);
        assert_eq!(parts[0].line_item_count, 2);
        assert!(parts[0].is_split());
    }
}
