//! Recording and reversing picks against a store

use miette::Diagnostic;
use thiserror::Error;

use crate::core::store::{OrderStore, StoreError};
use crate::entities::Pick;

#[derive(Debug, Error, Diagnostic)]
pub enum PickError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("line item '{line_item}' not found in order '{so_number}'")]
    #[diagnostic(code(wft::pick::line_item), help("Run `wft status <SO>` to list line item ids."))]
    LineItemNotFound { so_number: String, line_item: String },

    #[error("tool '{tool}' not found in order '{so_number}'")]
    #[diagnostic(code(wft::pick::tool), help("Pass a tool number or tool id from `wft order show <SO>`."))]
    ToolNotFound { so_number: String, tool: String },

    #[error("line item '{line_item}' (part {part_number}) does not apply to tool {tool_number}")]
    #[diagnostic(code(wft::pick::not_applicable))]
    ToolNotApplicable {
        line_item: String,
        part_number: String,
        tool_number: String,
    },

    #[error("pick quantity must be positive, got {0}")]
    #[diagnostic(code(wft::pick::quantity), help("Use `wft pick undo` to reverse a pick."))]
    NonPositiveQuantity(i64),

    #[error("pick '{0}' not found")]
    #[diagnostic(code(wft::pick::not_found))]
    PickNotFound(String),

    #[error("pick '{0}' has already been undone")]
    #[diagnostic(code(wft::pick::already_undone))]
    AlreadyUndone(String),

    #[error("pick '{0}' is itself an undo and cannot be reversed")]
    #[diagnostic(code(wft::pick::reversal), help("Record a new pick instead."))]
    UndoOfUndo(String),
}

/// What to record
#[derive(Debug, Clone)]
pub struct PickRequest<'a> {
    pub so_number: &'a str,
    pub line_item_id: &'a str,
    /// Tool number or tool id
    pub tool: &'a str,
    pub qty: i64,
    pub picked_by: &'a str,
    pub notes: Option<String>,
}

/// Validate and append a pick; returns the stored pick
pub fn record_pick<S: OrderStore + ?Sized>(
    store: &mut S,
    request: PickRequest<'_>,
) -> Result<Pick, PickError> {
    if request.qty <= 0 {
        return Err(PickError::NonPositiveQuantity(request.qty));
    }

    let snapshot = store.require(request.so_number)?;
    let line_item = snapshot
        .line_item(request.line_item_id)
        .ok_or_else(|| PickError::LineItemNotFound {
            so_number: request.so_number.to_string(),
            line_item: request.line_item_id.to_string(),
        })?;
    let tool = snapshot
        .find_tool(request.tool)
        .ok_or_else(|| PickError::ToolNotFound {
            so_number: request.so_number.to_string(),
            tool: request.tool.to_string(),
        })?;

    if !line_item.applies_to(&tool.id) {
        return Err(PickError::ToolNotApplicable {
            line_item: line_item.id.clone(),
            part_number: line_item.part_number.clone(),
            tool_number: tool.tool_number.clone(),
        });
    }

    let mut pick = Pick::new(&line_item.id, &tool.id, request.qty, request.picked_by);
    pick.notes = request.notes;

    tracing::debug!(
        so_number = request.so_number,
        line_item = %pick.line_item_id,
        tool = %tool.tool_number,
        qty = pick.qty_picked,
        "recording pick"
    );
    store.insert_pick(request.so_number, pick.clone())?;
    Ok(pick)
}

/// Append a reversal of an earlier pick; returns the reversal
pub fn undo_pick<S: OrderStore + ?Sized>(
    store: &mut S,
    so_number: &str,
    pick_id: &str,
    picked_by: &str,
) -> Result<Pick, PickError> {
    let snapshot = store.require(so_number)?;
    let original = snapshot
        .pick(pick_id)
        .ok_or_else(|| PickError::PickNotFound(pick_id.to_string()))?;

    if original.is_reversal() {
        return Err(PickError::UndoOfUndo(pick_id.to_string()));
    }
    if snapshot.is_reversed(pick_id) {
        return Err(PickError::AlreadyUndone(pick_id.to_string()));
    }

    let reversal = original.reversal(picked_by);
    tracing::debug!(so_number, pick = pick_id, "undoing pick");
    store.insert_pick(so_number, reversal.clone())?;
    Ok(reversal)
}
