use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        inventory::{AdjustmentReason, StockAdjustment},
        supplier::{PurchaseItem, PurchaseOrder, PurchaseOrderStatus, StoreSupplierRequest, Supplier},
    },
    store::AppState,
};

#[derive(Error, Debug)]
pub enum ProcurementError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Supplier '{name}' already exists")]
    DuplicateSupplier { name: String },

    #[error("Supplier not found")]
    SupplierNotFound,

    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: Uuid },

    #[error("Purchase order not found")]
    PurchaseOrderNotFound,

    #[error("Purchase order has no items")]
    EmptyOrder,

    #[error("Purchase quantities must be at least 1")]
    InvalidQuantity,

    #[error("Cannot move purchase order from {from} to {to}")]
    InvalidTransition {
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },
}

pub fn add_supplier(state: &AppState, request: StoreSupplierRequest) -> Result<AppState, ProcurementError> {
    info!("Adding supplier '{}'", request.name);

    if state
        .suppliers
        .iter()
        .any(|supplier| supplier.name.eq_ignore_ascii_case(request.name.trim()))
    {
        return Err(ProcurementError::DuplicateSupplier { name: request.name });
    }

    let supplier = Supplier::new(request).map_err(|e| ProcurementError::ValidationError {
        message: format!("Supplier validation failed: {}", e),
    })?;

    let mut next = state.clone();
    next.suppliers.push(supplier);
    Ok(next)
}

pub fn create_purchase_order(
    state: &AppState,
    supplier_id: &Uuid,
    items: Vec<PurchaseItem>,
    at: DateTime<Utc>,
) -> Result<AppState, ProcurementError> {
    if state.supplier(supplier_id).is_none() {
        return Err(ProcurementError::SupplierNotFound);
    }
    if items.is_empty() {
        return Err(ProcurementError::EmptyOrder);
    }
    for item in &items {
        if item.quantity == 0 {
            return Err(ProcurementError::InvalidQuantity);
        }
        if !item.unit_cost.is_finite() || item.unit_cost < 0.0 {
            return Err(ProcurementError::ValidationError {
                message: "Unit cost must be a non-negative number".to_string(),
            });
        }
        if state.product(&item.product_id).is_none() {
            return Err(ProcurementError::ProductNotFound {
                product_id: item.product_id,
            });
        }
    }

    let order = PurchaseOrder::new(*supplier_id, items, at);
    info!(
        "Created purchase order {} for supplier {} ({} units)",
        order.id,
        supplier_id,
        order.unit_count()
    );

    let mut next = state.clone();
    next.purchase_orders.push(order);
    Ok(next)
}

pub fn mark_ordered(state: &AppState, id: &Uuid) -> Result<AppState, ProcurementError> {
    transition(state, id, PurchaseOrderStatus::Ordered)
}

pub fn cancel(state: &AppState, id: &Uuid) -> Result<AppState, ProcurementError> {
    transition(state, id, PurchaseOrderStatus::Cancelled)
}

/// Books an ordered purchase into stock. Each item raises the product's stock,
/// refreshes its unit cost and leaves a restock entry in the adjustment log.
pub fn receive(state: &AppState, id: &Uuid, at: DateTime<Utc>) -> Result<AppState, ProcurementError> {
    let mut next = transition(state, id, PurchaseOrderStatus::Received)?;

    let order = next
        .purchase_orders
        .iter_mut()
        .find(|order| order.id == *id)
        .ok_or(ProcurementError::PurchaseOrderNotFound)?;
    order.received_at = Some(at);
    let items = order.items.clone();
    let reference = format!("PO {}", &order.id.to_string()[..8]);

    for item in items {
        let Some(product) = next.product_mut(&item.product_id) else {
            warn!(
                "Received product {} is no longer in the catalog",
                item.product_id
            );
            continue;
        };

        let added = (u32::MAX - product.stock).min(item.quantity);
        if added < item.quantity {
            warn!(
                "Stock for {} is full; booked {} of {} received",
                product.sku, added, item.quantity
            );
        }
        product.stock += added;
        product.cost = item.unit_cost;
        product.updated_at = at;

        next.adjustments.push(StockAdjustment::new(
            item.product_id,
            i64::from(added),
            AdjustmentReason::Restock,
            Some(reference.clone()),
            at,
        ));
    }

    info!("Received purchase order {}", id);
    Ok(next)
}

/// Purchase orders that are still draft or on order.
pub fn outstanding(state: &AppState) -> Vec<&PurchaseOrder> {
    let orders: Vec<&PurchaseOrder> = state
        .purchase_orders
        .iter()
        .filter(|order| order.status.is_open())
        .collect();

    debug!("{} purchase orders outstanding", orders.len());
    orders
}

fn transition(
    state: &AppState,
    id: &Uuid,
    to: PurchaseOrderStatus,
) -> Result<AppState, ProcurementError> {
    let current = state
        .purchase_order(id)
        .ok_or(ProcurementError::PurchaseOrderNotFound)?;

    if !current.status.can_transition_to(to) {
        return Err(ProcurementError::InvalidTransition {
            from: current.status,
            to,
        });
    }

    let mut next = state.clone();
    if let Some(order) = next.purchase_orders.iter_mut().find(|order| order.id == *id) {
        info!("Purchase order {}: {} -> {}", id, order.status, to);
        order.status = to;
    }
    Ok(next)
}
