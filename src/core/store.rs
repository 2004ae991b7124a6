//! Order store - the data-access boundary
//!
//! The reconciliation code never performs I/O; callers fetch an
//! [`OrderSnapshot`] through an [`OrderStore`] first. [`YamlOrderStore`] keeps
//! one YAML document per sales order under the project's `orders/`
//! directory. [`MemoryOrderStore`] backs tests.

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::loader::{load_file, yaml_files};
use crate::core::project::{order_file_stem, Project};
use crate::core::snapshot::OrderSnapshot;
use crate::entities::{Order, OrderStatus, Pick};
use crate::yaml::YamlError;

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("order '{0}' not found")]
    #[diagnostic(code(wft::store::not_found), help("Run `wft order list` to see known orders."))]
    OrderNotFound(String),

    #[error("pick for order '{so_number}' references unknown line item '{line_item_id}'")]
    #[diagnostic(code(wft::store::unknown_line_item))]
    UnknownLineItem {
        so_number: String,
        line_item_id: String,
    },

    #[error("order '{so_number}' would overwrite order '{existing}' in {path}")]
    #[diagnostic(
        code(wft::store::file_collision),
        help("Both SO numbers map to the same file name; rename one of them.")
    )]
    FileCollision {
        so_number: String,
        existing: String,
        path: PathBuf,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("failed to serialize order '{so_number}': {source}")]
    #[diagnostic(code(wft::store::serialize))]
    Serialize {
        so_number: String,
        source: serde_yml::Error,
    },

    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(wft::store::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Filter for order queries
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,

    /// Case-insensitive substring of the customer name
    pub customer: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(ref customer) = self.customer {
            if !order
                .customer_name
                .to_lowercase()
                .contains(&customer.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Filtered query, insert and delete over order snapshots
pub trait OrderStore {
    /// Keys of every stored order
    fn order_numbers(&self) -> Result<Vec<String>, StoreError>;

    fn fetch(&self, so_number: &str) -> Result<Option<OrderSnapshot>, StoreError>;

    /// Insert or replace a whole snapshot
    fn save(&mut self, snapshot: &OrderSnapshot) -> Result<(), StoreError>;

    /// Delete an order and its children; `false` if it did not exist
    fn delete_order(&mut self, so_number: &str) -> Result<bool, StoreError>;

    /// Fetch an order that must exist
    fn require(&self, so_number: &str) -> Result<OrderSnapshot, StoreError> {
        self.fetch(so_number)?
            .ok_or_else(|| StoreError::OrderNotFound(so_number.to_string()))
    }

    /// Orders matching the filter; unreadable orders are logged and skipped
    fn find_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        let mut orders = Vec::new();
        for so in self.order_numbers()? {
            match self.fetch(&so) {
                Ok(Some(snapshot)) if filter.matches(&snapshot.order) => orders.push(snapshot.order),
                Ok(_) => {}
                Err(e) => tracing::warn!(so_number = %so, error = %e, "skipping order"),
            }
        }
        orders.sort_by(|a, b| a.so_number.cmp(&b.so_number));
        Ok(orders)
    }

    /// Append a pick to an order
    fn insert_pick(&mut self, so_number: &str, pick: Pick) -> Result<(), StoreError> {
        let mut snapshot = self.require(so_number)?;
        if snapshot.line_item(&pick.line_item_id).is_none() {
            return Err(StoreError::UnknownLineItem {
                so_number: so_number.to_string(),
                line_item_id: pick.line_item_id,
            });
        }
        snapshot.picks.push(pick);
        self.save(&snapshot)
    }
}

/// One YAML snapshot file per order
#[derive(Debug, Clone)]
pub struct YamlOrderStore {
    dir: PathBuf,
}

impl YamlOrderStore {
    pub fn new(project: &Project) -> Self {
        Self {
            dir: project.orders_dir(),
        }
    }

    fn path_for(&self, so_number: &str) -> PathBuf {
        self.dir.join(format!("{}.yaml", order_file_stem(so_number)))
    }

    /// File stems are lossy, so the stored SO number decides ownership
    fn load_owned(&self, so_number: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        let path = self.path_for(so_number);
        let snapshot: Option<OrderSnapshot> = load_file(&path)?;
        Ok(snapshot.filter(|s| {
            let owned = s.so_number() == so_number;
            if !owned {
                tracing::debug!(
                    so_number,
                    stored = s.so_number(),
                    path = %path.display(),
                    "file belongs to another order"
                );
            }
            owned
        }))
    }
}

impl OrderStore for YamlOrderStore {
    fn order_numbers(&self) -> Result<Vec<String>, StoreError> {
        let mut numbers = Vec::new();
        for path in yaml_files(&self.dir) {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_file::<OrderSnapshot>(&path) {
                Ok(Some(snapshot)) if order_file_stem(snapshot.so_number()) == stem => {
                    numbers.push(snapshot.order.so_number)
                }
                Ok(Some(snapshot)) => tracing::warn!(
                    path = %path.display(),
                    so_number = snapshot.so_number(),
                    "order file is misnamed; skipping"
                ),
                Ok(None) => {}
                // Unreadable files keep their stem so fetch reports the error
                Err(_) => numbers.push(stem.to_string()),
            }
        }
        numbers.sort();
        Ok(numbers)
    }

    fn fetch(&self, so_number: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        tracing::debug!(so_number, path = %self.path_for(so_number).display(), "fetching order");
        self.load_owned(so_number)
    }

    fn save(&mut self, snapshot: &OrderSnapshot) -> Result<(), StoreError> {
        let path = self.path_for(snapshot.so_number());
        if let Ok(Some(existing)) = load_file::<OrderSnapshot>(&path) {
            if existing.so_number() != snapshot.so_number() {
                return Err(StoreError::FileCollision {
                    so_number: snapshot.so_number().to_string(),
                    existing: existing.order.so_number,
                    path,
                });
            }
        }

        let yaml = serde_yml::to_string(snapshot).map_err(|source| StoreError::Serialize {
            so_number: snapshot.so_number().to_string(),
            source,
        })?;

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, yaml).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(so_number = snapshot.so_number(), path = %path.display(), "saved order");
        Ok(())
    }

    fn delete_order(&mut self, so_number: &str) -> Result<bool, StoreError> {
        if self.load_owned(so_number)?.is_none() {
            return Ok(false);
        }
        let path = self.path_for(so_number);
        fs::remove_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(so_number, "deleted order");
        Ok(true)
    }
}

/// In-memory store keyed by SO number
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: BTreeMap<String, OrderSnapshot>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(snapshots: impl IntoIterator<Item = OrderSnapshot>) -> Self {
        Self {
            orders: snapshots
                .into_iter()
                .map(|s| (s.so_number().to_string(), s))
                .collect(),
        }
    }
}

impl OrderStore for MemoryOrderStore {
    fn order_numbers(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.orders.keys().cloned().collect())
    }

    fn fetch(&self, so_number: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        Ok(self.orders.get(so_number).cloned())
    }

    fn save(&mut self, snapshot: &OrderSnapshot) -> Result<(), StoreError> {
        self.orders
            .insert(snapshot.so_number().to_string(), snapshot.clone());
        Ok(())
    }

    fn delete_order(&mut self, so_number: &str) -> Result<bool, StoreError> {
        Ok(self.orders.remove(so_number).is_some())
    }
}
