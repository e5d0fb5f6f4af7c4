use chrono::{DateTime, Duration, Utc};

use crate::{
    models::{
        cart::Discount,
        customer::StoreCustomerRequest,
        product::{ProductCategory, StoreProductRequest},
        sale::PaymentMethod,
        supplier::{PurchaseItem, StoreSupplierRequest},
    },
    store::{AppState, Command, Coordinator, StoreError, StoreSettings},
};

// sku, name, category, price, cost, stock
const CATALOG: &[(&str, &str, ProductCategory, f64, f64, u32)] = &[
    ("CF-001", "Iced Milk Coffee", ProductCategory::Coffee, 35_000.0, 12_000.0, 80),
    ("CF-002", "Black Coffee", ProductCategory::Coffee, 29_000.0, 9_000.0, 64),
    ("CF-003", "Salted Cream Coffee", ProductCategory::Coffee, 45_000.0, 16_000.0, 3),
    ("TEA-001", "Peach Lemongrass Tea", ProductCategory::Tea, 42_000.0, 14_000.0, 40),
    ("TEA-002", "Jasmine Milk Tea", ProductCategory::Tea, 39_000.0, 13_000.0, 0),
    ("BK-001", "Butter Croissant", ProductCategory::Bakery, 28_000.0, 11_000.0, 18),
    ("BK-002", "Banh Mi Pate", ProductCategory::Bakery, 25_000.0, 10_000.0, 4),
    ("SN-001", "Dried Mango", ProductCategory::Snack, 32_000.0, 15_000.0, 22),
    ("ML-001", "Chicken Rice Bowl", ProductCategory::Meal, 65_000.0, 30_000.0, 12),
    ("BV-001", "Coconut Water", ProductCategory::Beverage, 25_000.0, 11_000.0, 30),
    ("GR-001", "Ground Coffee 500g", ProductCategory::Grocery, 180_000.0, 110_000.0, 9),
];

/// Builds the demo store the CLI starts from. Everything goes through
/// [`Coordinator::dispatch`], so the result obeys the same rules as live use.
pub fn seed_state(settings: StoreSettings, now: DateTime<Utc>) -> Result<AppState, StoreError> {
    let mut store = Coordinator::new(AppState::new(settings));

    for &(sku, name, category, price, cost, stock) in CATALOG {
        store.dispatch(Command::AddProduct(StoreProductRequest {
            sku: sku.to_string(),
            name: name.to_string(),
            category,
            price,
            cost,
            stock,
            low_stock_threshold: None,
            icon: None,
            supplier_id: None,
        }))?;
    }

    store.dispatch(Command::AddCustomer(StoreCustomerRequest {
        name: "Nguyen Thi Lan".to_string(),
        phone: Some("0901234567".to_string()),
    }))?;
    store.dispatch(Command::AddCustomer(StoreCustomerRequest {
        name: "Tran Minh Duc".to_string(),
        phone: Some("+84 912 345 678".to_string()),
    }))?;

    store.dispatch(Command::AddSupplier(StoreSupplierRequest {
        name: "Highland Beans Co.".to_string(),
        contact_name: Some("Pham Van Hai".to_string()),
        phone: Some("0283 456 789".to_string()),
        email: Some("orders@highlandbeans.vn".to_string()),
    }))?;
    store.dispatch(Command::AddSupplier(StoreSupplierRequest {
        name: "Saigon Bakery Supply".to_string(),
        contact_name: None,
        phone: Some("0287 654 321".to_string()),
        email: None,
    }))?;

    let product_id = |store: &Coordinator, sku: &str| {
        store
            .state()
            .product_by_sku(sku)
            .map(|product| product.id)
            .unwrap_or_default()
    };

    let beans = store.state().suppliers[0].id;
    let items = vec![
        PurchaseItem {
            product_id: product_id(&store, "GR-001"),
            quantity: 12,
            unit_cost: 105_000.0,
        },
        PurchaseItem {
            product_id: product_id(&store, "CF-003"),
            quantity: 20,
            unit_cost: 16_000.0,
        },
    ];
    store.dispatch(Command::CreatePurchaseOrder {
        supplier_id: beans,
        items,
        at: now - Duration::days(1),
    })?;
    let order_id = store.state().purchase_orders[0].id;
    store.dispatch(Command::MarkPurchaseOrdered(order_id))?;

    // A few sales from earlier today.
    let regular = store.state().customers[0].id;
    let history: [(&[(&str, u32)], PaymentMethod, Option<Discount>, i64); 3] = [
        (
            &[("CF-001", 2), ("BK-001", 1)],
            PaymentMethod::Cash { tendered: 200_000.0 },
            None,
            180,
        ),
        (
            &[("TEA-001", 1), ("ML-001", 1)],
            PaymentMethod::Card,
            Some(Discount::percentage(10.0)),
            95,
        ),
        (&[("CF-002", 3)], PaymentMethod::Credit, None, 40),
    ];

    for (lines, payment, discount, minutes_ago) in history {
        for &(sku, quantity) in lines {
            store.dispatch(Command::AddToCart {
                product_id: product_id(&store, sku),
                quantity,
            })?;
        }
        store.dispatch(Command::SetOrderDiscount(discount))?;
        if matches!(payment, PaymentMethod::Credit) {
            store.dispatch(Command::AttachCustomer(Some(regular)))?;
        }
        store.dispatch(Command::Checkout {
            payment,
            at: now - Duration::minutes(minutes_ago),
        })?;
    }

    Ok(store.into_state())
}
