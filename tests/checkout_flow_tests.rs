use chrono::Utc;
use uuid::Uuid;

use pos_terminal::models::cart::Discount;
use pos_terminal::models::customer::StoreCustomerRequest;
use pos_terminal::models::inventory::AdjustmentReason;
use pos_terminal::models::product::{ProductCategory, StoreProductRequest};
use pos_terminal::models::sale::PaymentMethod;
use pos_terminal::services::{cart_service, CartError, CheckoutError};
use pos_terminal::store::{AppState, Command, Coordinator, StoreError, StoreSettings};

fn product_request(sku: &str, name: &str, price: f64, stock: u32) -> StoreProductRequest {
    StoreProductRequest {
        sku: sku.to_string(),
        name: name.to_string(),
        category: ProductCategory::Coffee,
        price,
        cost: price / 3.0,
        stock,
        low_stock_threshold: None,
        icon: None,
        supplier_id: None,
    }
}

fn setup_store() -> (Coordinator, Uuid, Uuid) {
    let mut store = Coordinator::new(AppState::new(StoreSettings::default()));
    store
        .dispatch(Command::AddProduct(product_request(
            "CF-001",
            "Iced Milk Coffee",
            35_000.0,
            10,
        )))
        .unwrap();
    store
        .dispatch(Command::AddProduct(product_request(
            "BK-001",
            "Butter Croissant",
            100_000.0,
            2,
        )))
        .unwrap();

    let coffee = store.state().product_by_sku("CF-001").unwrap().id;
    let croissant = store.state().product_by_sku("BK-001").unwrap().id;
    (store, coffee, croissant)
}

#[test]
fn test_cash_checkout_end_to_end() {
    let (mut store, coffee, _) = setup_store();

    store
        .dispatch(Command::AddToCart {
            product_id: coffee,
            quantity: 2,
        })
        .unwrap();

    let totals = cart_service::totals(store.state());
    assert_eq!(totals.subtotal, 70_000.0);
    assert_eq!(totals.tax, 7_000.0);
    assert_eq!(totals.total, 77_000.0);

    let state = store
        .dispatch(Command::Checkout {
            payment: PaymentMethod::Cash {
                tendered: 100_000.0,
            },
            at: Utc::now(),
        })
        .unwrap();

    let sale = state.last_sale().unwrap();
    assert_eq!(sale.receipt_number(), "S00001");
    assert_eq!(sale.change, 23_000.0);
    assert!(state.cart.is_empty());
    assert_eq!(state.product(&coffee).unwrap().stock, 8);
    assert_eq!(state.adjustments.last().unwrap().reason, AdjustmentReason::Sale);
    assert_eq!(state.adjustments.last().unwrap().delta, -2);
}

#[test]
fn test_insufficient_cash_leaves_state_untouched() {
    let (mut store, coffee, _) = setup_store();

    // 40_000 + 4_000 tax + 6_000 surcharge = 50_000 due
    store
        .dispatch(Command::UpdateProduct {
            id: coffee,
            request: pos_terminal::models::product::UpdateProductRequest {
                price: Some(40_000.0),
                ..Default::default()
            },
        })
        .unwrap();
    store
        .dispatch(Command::AddToCart {
            product_id: coffee,
            quantity: 1,
        })
        .unwrap();
    store.dispatch(Command::SetSurcharge(6_000.0)).unwrap();

    let before = store.state().clone();
    let revision = store.revision();

    let result = store.dispatch(Command::Checkout {
        payment: PaymentMethod::Cash {
            tendered: 40_000.0,
        },
        at: Utc::now(),
    });

    match result {
        Err(StoreError::Checkout(CheckoutError::InsufficientCash { total, tendered })) => {
            assert_eq!(total, 50_000.0);
            assert_eq!(tendered, 40_000.0);
        }
        other => panic!("expected insufficient cash, got {:?}", other.map(|_| ())),
    }

    assert_eq!(store.state(), &before);
    assert_eq!(store.revision(), revision);
    assert!(store.state().sales.is_empty());
}

#[test]
fn test_order_discount_flow() {
    let (mut store, _, croissant) = setup_store();

    store
        .dispatch(Command::AddToCart {
            product_id: croissant,
            quantity: 1,
        })
        .unwrap();
    store
        .dispatch(Command::SetOrderDiscount(Some(Discount::percentage(10.0))))
        .unwrap();

    let totals = cart_service::totals(store.state());
    assert_eq!(totals.discount_amount, 10_000.0);
    assert_eq!(totals.tax, 9_000.0);
    assert_eq!(totals.total, 99_000.0);

    let state = store
        .dispatch(Command::Checkout {
            payment: PaymentMethod::Card,
            at: Utc::now(),
        })
        .unwrap();
    assert_eq!(state.sales[0].totals.total, 99_000.0);
    assert_eq!(state.sales[0].change, 0.0);
}

#[test]
fn test_cannot_add_more_than_stock() {
    let (mut store, _, croissant) = setup_store();

    store
        .dispatch(Command::AddToCart {
            product_id: croissant,
            quantity: 2,
        })
        .unwrap();
    let result = store.dispatch(Command::AddToCart {
        product_id: croissant,
        quantity: 1,
    });

    assert!(matches!(
        result,
        Err(StoreError::Cart(CartError::InsufficientStock { .. }))
    ));
    assert_eq!(store.state().cart.lines[0].quantity, 2);
}

#[test]
fn test_huge_add_leaves_cart_and_revision_alone() {
    let (mut store, coffee, _) = setup_store();

    store
        .dispatch(Command::AddToCart {
            product_id: coffee,
            quantity: 1,
        })
        .unwrap();
    let revision = store.revision();

    let result = store.dispatch(Command::AddToCart {
        product_id: coffee,
        quantity: u32::MAX,
    });

    assert!(matches!(
        result,
        Err(StoreError::Cart(CartError::InsufficientStock { .. }))
    ));
    assert_eq!(store.state().cart.lines[0].quantity, 1);
    assert_eq!(store.revision(), revision);
}

#[test]
fn test_credit_sale_and_settlement() {
    let (mut store, coffee, _) = setup_store();
    store
        .dispatch(Command::AddCustomer(StoreCustomerRequest {
            name: "Nguyen Thi Lan".to_string(),
            phone: Some("0901234567".to_string()),
        }))
        .unwrap();
    let customer_id = store.state().customers[0].id;

    store
        .dispatch(Command::AddToCart {
            product_id: coffee,
            quantity: 2,
        })
        .unwrap();

    // No customer attached yet
    assert!(matches!(
        store.dispatch(Command::Checkout {
            payment: PaymentMethod::Credit,
            at: Utc::now(),
        }),
        Err(StoreError::Checkout(CheckoutError::CustomerRequired))
    ));

    store
        .dispatch(Command::AttachCustomer(Some(customer_id)))
        .unwrap();
    store
        .dispatch(Command::Checkout {
            payment: PaymentMethod::Credit,
            at: Utc::now(),
        })
        .unwrap();
    assert_eq!(store.state().customer(&customer_id).unwrap().credit_balance, 77_000.0);

    store
        .dispatch(Command::SettleCredit {
            customer_id,
            amount: 50_000.0,
        })
        .unwrap();
    assert_eq!(store.state().customer(&customer_id).unwrap().credit_balance, 27_000.0);
}

#[test]
fn test_split_then_resume_draft() {
    let (mut store, coffee, croissant) = setup_store();

    store
        .dispatch(Command::AddToCart {
            product_id: coffee,
            quantity: 1,
        })
        .unwrap();
    store
        .dispatch(Command::AddToCart {
            product_id: croissant,
            quantity: 1,
        })
        .unwrap();
    store
        .dispatch(Command::SplitOrder {
            indices: vec![1],
            label: "Table 2".to_string(),
            at: Utc::now(),
        })
        .unwrap();

    let state = store.state();
    assert_eq!(state.cart.lines.len(), 1);
    assert_eq!(state.cart.lines[0].product_id, coffee);
    assert_eq!(state.drafts[0].label, "Table 2");
    assert_eq!(cart_service::totals(state).total, 38_500.0);

    let draft_id = state.drafts[0].id;
    store
        .dispatch(Command::Checkout {
            payment: PaymentMethod::Transfer,
            at: Utc::now(),
        })
        .unwrap();
    store.dispatch(Command::ResumeDraft(draft_id)).unwrap();

    let state = store.state();
    assert_eq!(state.cart.lines[0].product_id, croissant);
    assert!(state.drafts.is_empty());
    assert_eq!(state.sales.len(), 1);
}
