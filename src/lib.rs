//! WFT: Warehouse Fulfillment Toolkit
//!
//! Tracks customer orders, the tools built for each order, the line items
//! (parts) those tools need, and the picks recorded against them. The
//! [`reconcile`] module is the framework-independent core: it turns an
//! [`core::OrderSnapshot`] into quantities needed, picked and remaining, and
//! surfaces split line items and drift against expected totals.

pub mod cli;
pub mod core;
pub mod entities;
pub mod reconcile;
pub mod yaml;
