use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    models::{
        inventory::{AdjustmentReason, StockAdjustment},
        product::Product,
    },
    store::AppState,
};

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Adjustment must change the stock level")]
    ZeroDelta,

    #[error("Cannot apply {delta} to '{name}': only {stock} on hand")]
    InsufficientStock { name: String, stock: u32, delta: i64 },

    #[error("Stock level for '{name}' would overflow")]
    StockOverflow { name: String },
}

pub fn adjust_stock(
    state: &AppState,
    product_id: &Uuid,
    delta: i64,
    reason: AdjustmentReason,
    note: Option<String>,
    at: DateTime<Utc>,
) -> Result<AppState, InventoryError> {
    if delta == 0 {
        return Err(InventoryError::ZeroDelta);
    }

    let mut next = state.clone();
    let product = next
        .product_mut(product_id)
        .ok_or(InventoryError::ProductNotFound)?;

    let new_stock = i64::from(product.stock)
        .checked_add(delta)
        .ok_or_else(|| InventoryError::StockOverflow {
            name: product.name.clone(),
        })?;
    if new_stock < 0 {
        return Err(InventoryError::InsufficientStock {
            name: product.name.clone(),
            stock: product.stock,
            delta,
        });
    }
    product.stock = u32::try_from(new_stock).map_err(|_| InventoryError::StockOverflow {
        name: product.name.clone(),
    })?;
    product.updated_at = at;

    info!(
        "Adjusted stock for {} by {} ({}), now {}",
        product.sku, delta, reason, product.stock
    );

    let note = note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    next.adjustments
        .push(StockAdjustment::new(*product_id, delta, reason, note, at));
    Ok(next)
}

/// Products at or below their low-stock threshold, emptiest first.
pub fn low_stock(state: &AppState) -> Vec<&Product> {
    let mut products: Vec<&Product> = state
        .products
        .iter()
        .filter(|product| product.is_low_stock())
        .collect();
    products.sort_by_key(|product| product.stock);

    debug!("{} products are low on stock", products.len());
    products
}

/// Adjustment history for one product, newest first.
pub fn history<'a>(state: &'a AppState, product_id: &Uuid) -> Vec<&'a StockAdjustment> {
    let mut entries: Vec<&StockAdjustment> = state
        .adjustments
        .iter()
        .filter(|entry| entry.product_id == *product_id)
        .collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
}

/// Value of stock on hand at cost.
pub fn stock_value(state: &AppState) -> f64 {
    state
        .products
        .iter()
        .map(|product| product.cost * product.stock as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{ProductCategory, StoreProductRequest};
    use chrono::Duration;

    fn state() -> AppState {
        let mut state = AppState::default();
        for (sku, stock) in [("GR-001", 40), ("GR-002", 3), ("GR-003", 0)] {
            state.products.push(
                Product::new(
                    StoreProductRequest {
                        sku: sku.to_string(),
                        name: format!("Grocery {}", sku),
                        category: ProductCategory::Grocery,
                        price: 20_000.0,
                        cost: 12_000.0,
                        stock,
                        low_stock_threshold: None,
                        icon: None,
                        supplier_id: None,
                    },
                    5,
                )
                .unwrap(),
            );
        }
        state
    }

    #[test]
    fn test_adjust_stock_records_entry() {
        let state = state();
        let id = state.products[0].id;

        let next = adjust_stock(
            &state,
            &id,
            -4,
            AdjustmentReason::Damage,
            Some(" dropped crate ".to_string()),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(next.products[0].stock, 36);
        assert_eq!(next.adjustments.len(), 1);
        assert_eq!(next.adjustments[0].note.as_deref(), Some("dropped crate"));
        assert_eq!(state.products[0].stock, 40);
    }

    #[test]
    fn test_adjust_stock_cannot_go_negative() {
        let state = state();
        let id = state.products[1].id;

        let result = adjust_stock(&state, &id, -4, AdjustmentReason::Correction, None, Utc::now());
        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock { stock: 3, delta: -4, .. })
        ));
    }

    #[test]
    fn test_huge_delta_overflows_cleanly() {
        let state = state();
        let id = state.products[0].id;

        for delta in [i64::MAX, i64::from(u32::MAX)] {
            let result = adjust_stock(&state, &id, delta, AdjustmentReason::Restock, None, Utc::now());
            assert!(matches!(result, Err(InventoryError::StockOverflow { .. })));
        }
        assert!(matches!(
            adjust_stock(&state, &id, i64::MIN, AdjustmentReason::Correction, None, Utc::now()),
            Err(InventoryError::InsufficientStock { stock: 40, .. })
        ));
    }

    #[test]
    fn test_zero_delta_rejected() {
        let state = state();
        let id = state.products[0].id;
        assert!(matches!(
            adjust_stock(&state, &id, 0, AdjustmentReason::Restock, None, Utc::now()),
            Err(InventoryError::ZeroDelta)
        ));
    }

    #[test]
    fn test_low_stock_sorted_emptiest_first() {
        let state = state();
        let low = low_stock(&state);
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].sku, "GR-003");
        assert_eq!(low[1].sku, "GR-002");
    }

    #[test]
    fn test_history_newest_first() {
        let state = state();
        let id = state.products[0].id;
        let earlier = Utc::now() - Duration::hours(2);

        let state = adjust_stock(&state, &id, 5, AdjustmentReason::Restock, None, earlier).unwrap();
        let state = adjust_stock(&state, &id, -1, AdjustmentReason::Damage, None, Utc::now()).unwrap();

        let entries = history(&state, &id);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reason, AdjustmentReason::Damage);
    }

    #[test]
    fn test_stock_value_at_cost() {
        assert_eq!(stock_value(&state()), 43.0 * 12_000.0);
    }
}
