use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    io::csv::ProductRow,
    models::{
        cart::Discount,
        customer::StoreCustomerRequest,
        inventory::AdjustmentReason,
        product::{StoreProductRequest, UpdateProductRequest},
        sale::PaymentMethod,
        supplier::{PurchaseItem, StoreSupplierRequest},
    },
    services::{
        cart_service, catalog_service, checkout_service, customer_service, draft_service,
        inventory_service, procurement_service, CartError, CatalogError, CheckoutError,
        CustomerError, DraftError, InventoryError, ProcurementError,
    },
    store::AppState,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Procurement(#[from] ProcurementError),
}

/// Every state change the terminal can make. Line indices are zero-based.
#[derive(Debug, Clone)]
pub enum Command {
    AddToCart { product_id: Uuid, quantity: u32 },
    SetQuantity { index: usize, quantity: u32 },
    RemoveLine { index: usize },
    SetLineDiscount { index: usize, discount: Option<Discount> },
    SetOrderDiscount(Option<Discount>),
    SetSurcharge(f64),
    AttachCustomer(Option<Uuid>),
    ClearCart,
    Checkout { payment: PaymentMethod, at: DateTime<Utc> },
    SaveDraft { label: String, at: DateTime<Utc> },
    ResumeDraft(Uuid),
    DeleteDraft(Uuid),
    SplitOrder { indices: Vec<usize>, label: String, at: DateTime<Utc> },
    AddProduct(StoreProductRequest),
    UpdateProduct { id: Uuid, request: UpdateProductRequest },
    DeleteProduct(Uuid),
    ImportProducts(Vec<ProductRow>),
    AdjustStock {
        product_id: Uuid,
        delta: i64,
        reason: AdjustmentReason,
        note: Option<String>,
        at: DateTime<Utc>,
    },
    AddSupplier(StoreSupplierRequest),
    CreatePurchaseOrder {
        supplier_id: Uuid,
        items: Vec<PurchaseItem>,
        at: DateTime<Utc>,
    },
    MarkPurchaseOrdered(Uuid),
    ReceivePurchaseOrder { id: Uuid, at: DateTime<Utc> },
    CancelPurchaseOrder(Uuid),
    AddCustomer(StoreCustomerRequest),
    SettleCredit { customer_id: Uuid, amount: f64 },
}

/// Applies one command to a snapshot and returns the resulting snapshot.
/// `state` itself is never modified.
pub fn reduce(state: &AppState, command: Command) -> Result<AppState, StoreError> {
    let next = match command {
        Command::AddToCart {
            product_id,
            quantity,
        } => cart_service::add_to_cart(state, &product_id, quantity)?,
        Command::SetQuantity { index, quantity } => {
            cart_service::set_quantity(state, index, quantity)?
        }
        Command::RemoveLine { index } => cart_service::remove_line(state, index)?,
        Command::SetLineDiscount { index, discount } => {
            cart_service::set_line_discount(state, index, discount)?
        }
        Command::SetOrderDiscount(discount) => cart_service::set_order_discount(state, discount),
        Command::SetSurcharge(amount) => cart_service::set_surcharge(state, amount),
        Command::AttachCustomer(customer_id) => cart_service::attach_customer(state, customer_id)?,
        Command::ClearCart => cart_service::clear(state),
        Command::Checkout { payment, at } => checkout_service::checkout(state, payment, at)?,
        Command::SaveDraft { label, at } => draft_service::save_draft(state, &label, at)?,
        Command::ResumeDraft(id) => draft_service::resume_draft(state, &id)?,
        Command::DeleteDraft(id) => draft_service::delete_draft(state, &id)?,
        Command::SplitOrder { indices, label, at } => {
            cart_service::split_order(state, &indices, label, at)?
        }
        Command::AddProduct(request) => catalog_service::add_product(state, request)?,
        Command::UpdateProduct { id, request } => {
            catalog_service::update_product(state, &id, request)?
        }
        Command::DeleteProduct(id) => catalog_service::delete_product(state, &id)?,
        Command::ImportProducts(rows) => catalog_service::import_products(state, rows)?,
        Command::AdjustStock {
            product_id,
            delta,
            reason,
            note,
            at,
        } => inventory_service::adjust_stock(state, &product_id, delta, reason, note, at)?,
        Command::AddSupplier(request) => procurement_service::add_supplier(state, request)?,
        Command::CreatePurchaseOrder {
            supplier_id,
            items,
            at,
        } => procurement_service::create_purchase_order(state, &supplier_id, items, at)?,
        Command::MarkPurchaseOrdered(id) => procurement_service::mark_ordered(state, &id)?,
        Command::ReceivePurchaseOrder { id, at } => procurement_service::receive(state, &id, at)?,
        Command::CancelPurchaseOrder(id) => procurement_service::cancel(state, &id)?,
        Command::AddCustomer(request) => customer_service::add_customer(state, request)?,
        Command::SettleCredit {
            customer_id,
            amount,
        } => customer_service::settle_credit(state, &customer_id, amount)?,
    };

    Ok(next)
}
