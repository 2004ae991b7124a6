//! Record trait - common interface for order child records

/// Common trait for records stored inside an order snapshot
pub trait Record {
    /// Human-readable record kind ("tool", "line item", "pick")
    const KIND: &'static str;

    /// The record's id
    fn id(&self) -> &str;

    /// The SO number of the owning order, when the record carries one
    fn order_id(&self) -> Option<&str>;
}

/// Find a record by exact id
pub fn find_by_id<'a, R: Record>(records: &'a [R], id: &str) -> Option<&'a R> {
    records.iter().find(|r| r.id() == id)
}

/// Ids that appear more than once, in first-seen order
pub fn duplicate_ids<R: Record>(records: &[R]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut dupes = Vec::new();
    for record in records {
        if !seen.insert(record.id()) && !dupes.iter().any(|d: &String| d == record.id()) {
            dupes.push(record.id().to_string());
        }
    }
    dupes
}
