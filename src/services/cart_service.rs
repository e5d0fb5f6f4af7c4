use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    models::{
        cart::{Cart, CartLine, Discount},
        draft::DraftOrder,
    },
    pricing::Totals,
    store::AppState,
};

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Only {available} of '{name}' in stock (requested {requested})")]
    InsufficientStock {
        name: String,
        available: u32,
        requested: u32,
    },

    #[error("Cart line {} does not exist", .index + 1)]
    LineNotFound { index: usize },

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("No cart lines selected")]
    EmptySelection,
}

/// Totals for the current cart.
pub fn totals(state: &AppState) -> Totals {
    Totals::for_cart(&state.cart)
}

/// Adds `quantity` units of a product, merging into an existing line for the
/// same product.
pub fn add_to_cart(state: &AppState, product_id: &Uuid, quantity: u32) -> Result<AppState, CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }

    let product = state
        .product(product_id)
        .ok_or(CartError::ProductNotFound)?;

    let in_cart = state.cart.quantity_of(product_id);
    let requested = in_cart
        .checked_add(quantity)
        .filter(|&requested| requested <= product.stock)
        .ok_or_else(|| CartError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock,
            requested: in_cart.saturating_add(quantity),
        })?;

    let mut next = state.clone();
    match next.cart.position_of(product_id) {
        Some(index) => next.cart.lines[index].quantity += quantity,
        None => next.cart.lines.push(CartLine::from_product(product, quantity)),
    }

    debug!(
        "Added {} x {} to cart ({} in cart)",
        quantity, product.sku, requested
    );
    Ok(next)
}

/// Sets a line's quantity. A quantity of zero removes the line.
pub fn set_quantity(state: &AppState, index: usize, quantity: u32) -> Result<AppState, CartError> {
    if quantity == 0 {
        return remove_line(state, index);
    }

    let line = state
        .cart
        .lines
        .get(index)
        .ok_or(CartError::LineNotFound { index })?;

    if let Some(product) = state.product(&line.product_id) {
        let elsewhere = state.cart.quantity_of(&line.product_id) - line.quantity;
        elsewhere
            .checked_add(quantity)
            .filter(|&requested| requested <= product.stock)
            .ok_or_else(|| CartError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: elsewhere.saturating_add(quantity),
            })?;
    }

    let mut next = state.clone();
    next.cart.lines[index].quantity = quantity;
    Ok(next)
}

pub fn remove_line(state: &AppState, index: usize) -> Result<AppState, CartError> {
    if index >= state.cart.lines.len() {
        return Err(CartError::LineNotFound { index });
    }

    let mut next = state.clone();
    let line = next.cart.lines.remove(index);
    debug!("Removed {} from cart", line.name);
    Ok(next)
}

pub fn set_line_discount(
    state: &AppState,
    index: usize,
    discount: Option<Discount>,
) -> Result<AppState, CartError> {
    if index >= state.cart.lines.len() {
        return Err(CartError::LineNotFound { index });
    }

    let mut next = state.clone();
    next.cart.lines[index].line_discount = discount;
    Ok(next)
}

pub fn set_order_discount(state: &AppState, discount: Option<Discount>) -> AppState {
    let mut next = state.clone();
    next.cart.order_discount = discount;
    next
}

pub fn set_surcharge(state: &AppState, surcharge: f64) -> AppState {
    let mut next = state.clone();
    next.cart.surcharge = surcharge;
    next
}

pub fn attach_customer(state: &AppState, customer_id: Option<Uuid>) -> Result<AppState, CartError> {
    if let Some(id) = customer_id {
        if state.customer(&id).is_none() {
            return Err(CartError::CustomerNotFound);
        }
    }

    let mut next = state.clone();
    next.cart.customer_id = customer_id;
    Ok(next)
}

pub fn clear(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.cart = Cart::default();
    next
}

/// Moves the selected lines out of the cart into a new draft order so they can
/// be settled separately. The order discount, surcharge and customer stay with
/// the lines left in the cart.
pub fn split_order(
    state: &AppState,
    indices: &[usize],
    label: String,
    at: DateTime<Utc>,
) -> Result<AppState, CartError> {
    if indices.is_empty() {
        return Err(CartError::EmptySelection);
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= state.cart.lines.len()) {
        return Err(CartError::LineNotFound { index });
    }

    let mut next = state.clone();
    let (moved, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut next.cart.lines)
        .into_iter()
        .enumerate()
        .partition(|(i, _)| indices.contains(i));
    next.cart.lines = kept.into_iter().map(|(_, line)| line).collect();

    let split_cart = Cart {
        lines: moved.into_iter().map(|(_, line)| line).collect(),
        ..Default::default()
    };
    let label = if label.trim().is_empty() {
        format!("Split {}", next.drafts.len() + 1)
    } else {
        label.trim().to_string()
    };

    let draft = DraftOrder::new(label, split_cart, at);
    info!(
        "Split {} lines into draft '{}' ({})",
        draft.cart.lines.len(),
        draft.label,
        draft.id
    );
    next.drafts.push(draft);
    Ok(next)
}
