//! Record identity using type-prefixed ULIDs
//!
//! Records created by `wft` get ids like `PICK-01HC2JB7SMQX7RS1Y0GFKBHPTD`.
//! Imported records keep whatever id the source system gave them, so the
//! entity structs store ids as plain strings and only new ids go through
//! [`RecordId`].

use std::fmt;
use ulid::Ulid;

/// Record type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPrefix {
    /// One physical unit within an order
    Tool,
    /// A required part within an order
    Li,
    /// A fulfillment event against a line item
    Pick,
}

impl RecordPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Tool => "TOOL",
            RecordPrefix::Li => "LI",
            RecordPrefix::Pick => "PICK",
        }
    }
}

impl fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated record identifier combining a type prefix and ULID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    prefix: RecordPrefix,
    ulid: Ulid,
}

impl RecordId {
    pub fn new(prefix: RecordPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> RecordPrefix {
        self.prefix
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LineItem, Pick, Tool};

    #[test]
    fn test_record_id_generation() {
        let id = RecordId::new(RecordPrefix::Pick);
        assert_eq!(id.prefix(), RecordPrefix::Pick);
        assert!(id.to_string().starts_with("PICK-"));
        assert_eq!(id.to_string().len(), 31);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a: String = RecordId::new(RecordPrefix::Li).into();
        let b: String = RecordId::new(RecordPrefix::Li).into();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_records_get_prefixed_ids() {
        assert!(Tool::new("3930", "3930-1").id.starts_with("TOOL-"));
        assert!(LineItem::new("3930", "613279", 24).id.starts_with("LI-"));
        assert!(Pick::new("li-1", "t1", 4, "Dana").id.starts_with("PICK-"));
    }
}
