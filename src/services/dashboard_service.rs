use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::sale::Sale,
    pricing::compute_line_total,
    services::inventory_service,
    store::AppState,
};

pub const TOP_PRODUCT_COUNT: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub revenue: f64,
}

// Dashboard statistics DTO
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DashboardSummary {
    pub day: Option<NaiveDate>,
    pub revenue: f64,
    pub order_count: usize,
    pub average_order_value: f64,
    pub items_sold: u32,
    pub top_products: Vec<ProductSales>,
    pub low_stock_count: usize,
    pub outstanding_credit: f64,
    pub open_purchase_orders: usize,
    pub stock_value: f64,
}

/// Local calendar day a sale was rung up on.
pub fn sale_day(sale: &Sale) -> NaiveDate {
    sale.created_at.with_timezone(&Local).date_naive()
}

/// Figures for the sales of `day`, or for all sales when `day` is `None`.
/// Stock, credit and purchasing figures always reflect the current state.
pub fn summarize(state: &AppState, day: Option<NaiveDate>) -> DashboardSummary {
    let sales: Vec<&Sale> = state
        .sales
        .iter()
        .filter(|sale| day.map_or(true, |d| sale_day(sale) == d))
        .collect();

    let revenue: f64 = sales.iter().map(|sale| sale.totals.total).sum();
    let order_count = sales.len();
    let average_order_value = if order_count > 0 {
        revenue / order_count as f64
    } else {
        0.0
    };

    let mut per_product: HashMap<Uuid, ProductSales> = HashMap::new();
    for line in sales.iter().flat_map(|sale| sale.lines.iter()) {
        let entry = per_product
            .entry(line.product_id)
            .or_insert_with(|| ProductSales {
                product_id: line.product_id,
                name: line.name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
        entry.quantity += line.quantity;
        entry.revenue += compute_line_total(line);
    }

    let mut top_products: Vec<ProductSales> = per_product.into_values().collect();
    top_products.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| b.revenue.total_cmp(&a.revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    top_products.truncate(TOP_PRODUCT_COUNT);

    let summary = DashboardSummary {
        day,
        revenue,
        order_count,
        average_order_value,
        items_sold: sales.iter().map(|sale| sale.item_count()).sum(),
        top_products,
        low_stock_count: inventory_service::low_stock(state).len(),
        outstanding_credit: state
            .customers
            .iter()
            .map(|customer| customer.credit_balance)
            .sum(),
        open_purchase_orders: state
            .purchase_orders
            .iter()
            .filter(|order| order.status.is_open())
            .count(),
        stock_value: inventory_service::stock_value(state),
    };

    debug!(
        "Dashboard: {} orders, revenue {}, {} low-stock products",
        summary.order_count, summary.revenue, summary.low_stock_count
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::CartLine;
    use crate::models::product::{Product, ProductCategory, StoreProductRequest};
    use crate::models::sale::PaymentMethod;
    use crate::services::checkout_service::checkout;
    use chrono::{Duration, Utc};

    fn product(sku: &str, price: f64) -> Product {
        Product::new(
            StoreProductRequest {
                sku: sku.to_string(),
                name: sku.to_string(),
                category: ProductCategory::Tea,
                price,
                cost: price / 2.0,
                stock: 100,
                low_stock_threshold: None,
                icon: None,
                supplier_id: None,
            },
            5,
        )
        .unwrap()
    }

    fn sell(state: &AppState, lines: &[(usize, u32)], at: chrono::DateTime<Utc>) -> AppState {
        let mut next = state.clone();
        for &(index, quantity) in lines {
            next.cart
                .lines
                .push(CartLine::from_product(&state.products[index], quantity));
        }
        checkout(&next, PaymentMethod::Card, at).unwrap()
    }

    #[test]
    fn test_empty_dashboard() {
        let summary = summarize(&AppState::default(), None);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.revenue, 0.0);
        assert_eq!(summary.average_order_value, 0.0);
        assert!(summary.top_products.is_empty());
    }

    #[test]
    fn test_summary_aggregates_sales() {
        let mut state = AppState::default();
        state.products.push(product("TEA-1", 20_000.0));
        state.products.push(product("TEA-2", 30_000.0));

        let now = Utc::now();
        let state = sell(&state, &[(0, 2), (1, 1)], now);
        let state = sell(&state, &[(1, 3)], now);

        let summary = summarize(&state, None);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.items_sold, 6);
        // (40_000 + 30_000) * 1.1 + 90_000 * 1.1
        assert!((summary.revenue - 176_000.0).abs() < 1e-6);
        assert!((summary.average_order_value - 88_000.0).abs() < 1e-6);
        assert_eq!(summary.top_products[0].name, "TEA-2");
        assert_eq!(summary.top_products[0].quantity, 4);
        assert_eq!(summary.top_products[1].quantity, 2);
    }

    #[test]
    fn test_summary_filters_by_day() {
        let mut state = AppState::default();
        state.products.push(product("TEA-1", 20_000.0));

        let now = Utc::now();
        let state = sell(&state, &[(0, 1)], now - Duration::days(3));
        let state = sell(&state, &[(0, 2)], now);

        let today = sale_day(state.sales.last().unwrap());
        let summary = summarize(&state, Some(today));
        assert_eq!(summary.order_count, 1);
        assert_eq!(summary.items_sold, 2);
        assert_eq!(summary.day, Some(today));
    }
}
