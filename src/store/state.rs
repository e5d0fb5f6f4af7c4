use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    cart::Cart,
    customer::Customer,
    draft::DraftOrder,
    inventory::StockAdjustment,
    product::Product,
    sale::Sale,
    supplier::{PurchaseOrder, Supplier},
};

pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub store_name: String,
    pub low_stock_threshold: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "POS Terminal".to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

/// A full snapshot of everything the terminal knows about.
///
/// Snapshots are never mutated once handed out; each command produces a new
/// one (see [`crate::store::reduce`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub settings: StoreSettings,
    pub products: Vec<Product>,
    pub cart: Cart,
    pub customers: Vec<Customer>,
    pub sales: Vec<Sale>,
    pub drafts: Vec<DraftOrder>,
    pub suppliers: Vec<Supplier>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub adjustments: Vec<StockAdjustment>,
}

impl AppState {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn product(&self, id: &Uuid) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    pub fn product_mut(&mut self, id: &Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == *id)
    }

    pub fn product_by_sku(&self, sku: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| product.sku.eq_ignore_ascii_case(sku.trim()))
    }

    pub fn customer(&self, id: &Uuid) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id == *id)
    }

    pub fn customer_mut(&mut self, id: &Uuid) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|customer| customer.id == *id)
    }

    pub fn supplier(&self, id: &Uuid) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == *id)
    }

    pub fn purchase_order(&self, id: &Uuid) -> Option<&PurchaseOrder> {
        self.purchase_orders.iter().find(|order| order.id == *id)
    }

    pub fn draft(&self, id: &Uuid) -> Option<&DraftOrder> {
        self.drafts.iter().find(|draft| draft.id == *id)
    }

    pub fn next_sale_number(&self) -> u32 {
        self.sales.iter().map(|sale| sale.number).max().unwrap_or(0) + 1
    }

    pub fn last_sale(&self) -> Option<&Sale> {
        self.sales.last()
    }
}
