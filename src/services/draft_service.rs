use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::draft::DraftOrder,
    store::AppState,
};

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Cart is empty, nothing to save")]
    EmptyCart,

    #[error("Draft order not found")]
    DraftNotFound,

    #[error("Finish or park the current cart before resuming a draft")]
    CartNotEmpty,
}

/// Parks the current cart as a draft and starts a fresh one.
pub fn save_draft(state: &AppState, label: &str, at: DateTime<Utc>) -> Result<AppState, DraftError> {
    if state.cart.is_empty() {
        return Err(DraftError::EmptyCart);
    }

    let mut next = state.clone();
    let label = match label.trim() {
        "" => format!("Draft {}", next.drafts.len() + 1),
        trimmed => trimmed.to_string(),
    };
    let cart = std::mem::take(&mut next.cart);
    let draft = DraftOrder::new(label, cart, at);

    info!("Saved draft '{}' ({})", draft.label, draft.id);
    next.drafts.push(draft);
    Ok(next)
}

/// Brings a draft back into the cart. The draft is consumed.
pub fn resume_draft(state: &AppState, id: &Uuid) -> Result<AppState, DraftError> {
    if !state.cart.is_empty() {
        return Err(DraftError::CartNotEmpty);
    }

    let position = state
        .drafts
        .iter()
        .position(|draft| draft.id == *id)
        .ok_or(DraftError::DraftNotFound)?;

    let mut next = state.clone();
    let draft = next.drafts.remove(position);
    info!("Resumed draft '{}' ({})", draft.label, draft.id);
    next.cart = draft.cart;
    Ok(next)
}

pub fn delete_draft(state: &AppState, id: &Uuid) -> Result<AppState, DraftError> {
    if state.draft(id).is_none() {
        return Err(DraftError::DraftNotFound);
    }

    let mut next = state.clone();
    next.drafts.retain(|draft| draft.id != *id);
    info!("Deleted draft {}", id);
    Ok(next)
}

/// Drafts, newest first.
pub fn list_drafts(state: &AppState) -> Vec<&DraftOrder> {
    let mut drafts: Vec<&DraftOrder> = state.drafts.iter().collect();
    drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    drafts
}
