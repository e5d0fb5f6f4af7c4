use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{
        cart::Cart,
        inventory::{AdjustmentReason, StockAdjustment},
        sale::{PaymentMethod, Sale},
    },
    pricing::Totals,
    store::AppState,
};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient cash: total is {total}, tendered {tendered}")]
    InsufficientCash { total: f64, tendered: f64 },

    #[error("Tendered amount must be a non-negative number")]
    InvalidTender,

    #[error("A customer must be attached to charge the order to credit")]
    CustomerRequired,

    #[error("Customer not found")]
    CustomerNotFound,
}

/// Change owed for a cash payment, or `InsufficientCash` when the tender does
/// not cover the total.
pub fn change_due(total: f64, tendered: f64) -> Result<f64, CheckoutError> {
    if !tendered.is_finite() || tendered < 0.0 {
        return Err(CheckoutError::InvalidTender);
    }
    if tendered < total {
        return Err(CheckoutError::InsufficientCash { total, tendered });
    }
    Ok(tendered - total)
}

/// Settles the current cart.
///
/// On success the sale is appended to `sales`, stock is taken out for every
/// line, a credit payment is added to the customer's balance and the cart is
/// emptied. On failure the given state is left as it was.
pub fn checkout(
    state: &AppState,
    payment: PaymentMethod,
    at: DateTime<Utc>,
) -> Result<AppState, CheckoutError> {
    if state.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let totals = Totals::for_cart(&state.cart);
    let customer_id = state.cart.customer_id;

    let change = match payment {
        PaymentMethod::Cash { tendered } => change_due(totals.total, tendered).map_err(|e| {
            warn!("Checkout blocked: {}", e);
            e
        })?,
        PaymentMethod::Credit => {
            let id = customer_id.ok_or(CheckoutError::CustomerRequired)?;
            if state.customer(&id).is_none() {
                return Err(CheckoutError::CustomerNotFound);
            }
            0.0
        }
        PaymentMethod::Card | PaymentMethod::Transfer => 0.0,
    };

    let mut next = state.clone();
    let cart = std::mem::take(&mut next.cart);

    if let (PaymentMethod::Credit, Some(id)) = (payment, customer_id) {
        if let Some(customer) = next.customer_mut(&id) {
            customer.credit_balance += totals.total;
            info!(
                "Charged {} to {} (balance now {})",
                totals.total, customer.name, customer.credit_balance
            );
        }
    }

    take_stock(&mut next, &cart, at);

    let sale = Sale {
        id: Uuid::new_v4(),
        number: next.next_sale_number(),
        lines: cart.lines,
        totals,
        payment,
        change,
        customer_id,
        created_at: at,
    };

    info!(
        "Sale {} completed: {} items, total {}, paid by {}",
        sale.receipt_number(),
        sale.item_count(),
        sale.totals.total,
        sale.payment
    );
    next.sales.push(sale);
    Ok(next)
}

fn take_stock(state: &mut AppState, cart: &Cart, at: DateTime<Utc>) {
    for line in &cart.lines {
        let Some(product) = state.product_mut(&line.product_id) else {
            warn!("Sold product {} is no longer in the catalog", line.sku);
            continue;
        };

        if product.stock < line.quantity {
            warn!(
                "Stock for {} would go negative ({} on hand, {} sold); clamping at zero",
                product.sku, product.stock, line.quantity
            );
        }
        let removed = product.stock.min(line.quantity);
        product.stock -= removed;

        state.adjustments.push(StockAdjustment::new(
            line.product_id,
            -(removed as i64),
            AdjustmentReason::Sale,
            None,
            at,
        ));
    }
}
