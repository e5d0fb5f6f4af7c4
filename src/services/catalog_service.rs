use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    io::csv::ProductRow,
    models::product::{Product, ProductError, ProductFilter, StoreProductRequest, UpdateProductRequest},
    store::AppState,
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Product not found")]
    ProductNotFound,

    #[error("SKU '{sku}' already exists")]
    DuplicateSku { sku: String },

    #[error("Product '{name}' is in the current cart")]
    ProductInCart { name: String },

    #[error("Product '{name}' is held in draft '{draft}'")]
    ProductInDraft { name: String, draft: String },
}

impl From<ProductError> for CatalogError {
    fn from(error: ProductError) -> Self {
        CatalogError::ValidationError {
            message: error.to_string(),
        }
    }
}

/// Products matching `filter`, in catalog order.
pub fn search<'a>(state: &'a AppState, filter: &ProductFilter) -> Vec<&'a Product> {
    debug!("Searching catalog with filter: {:?}", filter);

    let products: Vec<&Product> = state
        .products
        .iter()
        .filter(|product| filter.matches(product))
        .collect();

    debug!("Catalog search returned {} products", products.len());
    products
}

/// Next page of the catalog. `latency` is a fixed delay that stands in for a
/// network round trip.
pub async fn load_more(
    state: &AppState,
    offset: usize,
    limit: usize,
    latency: Duration,
) -> Vec<Product> {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    let page: Vec<Product> = state
        .products
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    debug!(
        "Loaded {} products at offset {} (catalog size {})",
        page.len(),
        offset,
        state.products.len()
    );
    page
}

pub fn add_product(state: &AppState, request: StoreProductRequest) -> Result<AppState, CatalogError> {
    info!("Adding product {} '{}'", request.sku, request.name);

    if state.product_by_sku(&request.sku).is_some() {
        return Err(CatalogError::DuplicateSku { sku: request.sku });
    }

    let product = Product::new(request, state.settings.low_stock_threshold)?;

    let mut next = state.clone();
    info!("Product added with ID: {}", product.id);
    next.products.push(product);
    Ok(next)
}

pub fn update_product(
    state: &AppState,
    id: &Uuid,
    request: UpdateProductRequest,
) -> Result<AppState, CatalogError> {
    info!("Updating product {}", id);

    request
        .validate()
        .map_err(|e| CatalogError::ValidationError {
            message: format!("Product update validation failed: {}", e),
        })?;

    let mut next = state.clone();
    let product = next
        .product_mut(id)
        .ok_or(CatalogError::ProductNotFound)?;
    product.update(request);

    // Keep open cart lines in step with the catalog name; the price a line
    // was added at is kept.
    let name = product.name.clone();
    for line in next.cart.lines.iter_mut().filter(|line| line.product_id == *id) {
        line.name = name.clone();
    }

    Ok(next)
}

pub fn delete_product(state: &AppState, id: &Uuid) -> Result<AppState, CatalogError> {
    let product = state.product(id).ok_or(CatalogError::ProductNotFound)?;

    if state.cart.position_of(id).is_some() {
        warn!("Refusing to delete product {} while it is in the cart", product.sku);
        return Err(CatalogError::ProductInCart {
            name: product.name.clone(),
        });
    }

    if let Some(draft) = state
        .drafts
        .iter()
        .find(|draft| draft.cart.position_of(id).is_some())
    {
        warn!(
            "Refusing to delete product {} while draft '{}' holds it",
            product.sku, draft.label
        );
        return Err(CatalogError::ProductInDraft {
            name: product.name.clone(),
            draft: draft.label.clone(),
        });
    }

    let mut next = state.clone();
    next.products.retain(|product| product.id != *id);
    info!("Deleted product {}", id);
    Ok(next)
}

/// Upserts imported rows by SKU. Either every row is applied or none is.
pub fn import_products(state: &AppState, rows: Vec<ProductRow>) -> Result<AppState, CatalogError> {
    info!("Importing {} product rows", rows.len());

    let mut next = state.clone();
    let mut created = 0;
    let mut updated = 0;

    for row in rows {
        let request = StoreProductRequest::from(row);
        request
            .validate()
            .map_err(|e| CatalogError::ValidationError {
                message: format!("Row for SKU '{}': {}", request.sku, e),
            })?;

        let existing = next
            .products
            .iter_mut()
            .find(|product| product.sku.eq_ignore_ascii_case(&request.sku));

        match existing {
            Some(product) => {
                product.update(UpdateProductRequest {
                    name: Some(request.name),
                    category: Some(request.category),
                    price: Some(request.price),
                    cost: Some(request.cost),
                    low_stock_threshold: request.low_stock_threshold,
                    ..Default::default()
                });
                product.stock = request.stock;
                updated += 1;
            }
            None => {
                let product = Product::new(request, next.settings.low_stock_threshold)?;
                next.products.push(product);
                created += 1;
            }
        }
    }

    info!("Import complete: {} created, {} updated", created, updated);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cart::{Cart, CartLine};
    use crate::models::draft::DraftOrder;
    use crate::models::product::{ProductCategory, StockStatus};
    use chrono::Utc;

    fn request(sku: &str, name: &str, stock: u32) -> StoreProductRequest {
        StoreProductRequest {
            sku: sku.to_string(),
            name: name.to_string(),
            category: ProductCategory::Bakery,
            price: 25_000.0,
            cost: 9_000.0,
            stock,
            low_stock_threshold: None,
            icon: None,
            supplier_id: None,
        }
    }

    fn state_with(products: &[(&str, &str, u32)]) -> AppState {
        let mut state = AppState::default();
        for (sku, name, stock) in products {
            state = add_product(&state, request(sku, name, *stock)).unwrap();
        }
        state
    }

    #[test]
    fn test_add_product_rejects_duplicate_sku() {
        let state = state_with(&[("BK-001", "Croissant", 10)]);
        let result = add_product(&state, request("bk-001", "Another", 1));
        assert!(matches!(result, Err(CatalogError::DuplicateSku { .. })));
        assert_eq!(state.products.len(), 1);
    }

    #[test]
    fn test_add_product_uses_store_threshold() {
        let mut state = AppState::default();
        state.settings.low_stock_threshold = 12;
        let state = add_product(&state, request("BK-001", "Croissant", 10)).unwrap();
        assert_eq!(state.products[0].low_stock_threshold, 12);
        assert_eq!(state.products[0].stock_status(), StockStatus::LowStock);
    }

    #[test]
    fn test_search_by_term_and_status() {
        let state = state_with(&[
            ("BK-001", "Croissant", 10),
            ("BK-002", "Banana Bread", 0),
            ("BK-003", "Pain au Chocolat", 30),
        ]);

        let found = search(&state, &ProductFilter::new().with_search("bread".to_string()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "BK-002");

        let out = search(
            &state,
            &ProductFilter::new().with_stock_status(StockStatus::OutOfStock),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_update_product_renames_cart_lines() {
        let mut state = state_with(&[("BK-001", "Croissant", 10)]);
        let id = state.products[0].id;
        state.cart.lines.push(CartLine::from_product(&state.products[0], 1));

        let next = update_product(
            &state,
            &id,
            UpdateProductRequest {
                name: Some("Butter Croissant".to_string()),
                price: Some(28_000.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(next.cart.lines[0].name, "Butter Croissant");
        assert_eq!(next.cart.lines[0].unit_price, 25_000.0);
        assert_eq!(next.products[0].price, 28_000.0);
    }

    #[test]
    fn test_delete_product_in_cart_is_refused() {
        let mut state = state_with(&[("BK-001", "Croissant", 10)]);
        let id = state.products[0].id;
        state.cart.lines.push(CartLine::from_product(&state.products[0], 1));

        assert!(matches!(
            delete_product(&state, &id),
            Err(CatalogError::ProductInCart { .. })
        ));

        state.cart.lines.clear();
        let next = delete_product(&state, &id).unwrap();
        assert!(next.products.is_empty());
    }

    #[test]
    fn test_delete_product_held_in_draft_is_refused() {
        let mut state = state_with(&[("BK-001", "Croissant", 10)]);
        let id = state.products[0].id;
        let cart = Cart {
            lines: vec![CartLine::from_product(&state.products[0], 2)],
            ..Default::default()
        };
        state
            .drafts
            .push(DraftOrder::new("Table 4".to_string(), cart, Utc::now()));

        assert!(matches!(
            delete_product(&state, &id),
            Err(CatalogError::ProductInDraft { draft, .. }) if draft == "Table 4"
        ));

        state.drafts.clear();
        assert!(delete_product(&state, &id).is_ok());
    }

    #[test]
    fn test_update_refuses_multiline_name() {
        let state = state_with(&[("BK-001", "Croissant", 10)]);
        let id = state.products[0].id;

        let result = update_product(
            &state,
            &id,
            UpdateProductRequest {
                name: Some("Croissant\nBK-002".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CatalogError::ValidationError { .. })));
    }

    #[test]
    fn test_import_upserts_by_sku() {
        let state = state_with(&[("BK-001", "Croissant", 10)]);
        let rows = vec![
            ProductRow {
                sku: "BK-001".to_string(),
                name: "Croissant".to_string(),
                category: ProductCategory::Bakery,
                price: 27_000.0,
                cost: 9_500.0,
                stock: 42,
                low_stock_threshold: None,
            },
            ProductRow {
                sku: "BK-009".to_string(),
                name: "Baguette".to_string(),
                category: ProductCategory::Bakery,
                price: 15_000.0,
                cost: 4_000.0,
                stock: 8,
                low_stock_threshold: Some(2),
            },
        ];

        let next = import_products(&state, rows).unwrap();
        assert_eq!(next.products.len(), 2);
        assert_eq!(next.products[0].price, 27_000.0);
        assert_eq!(next.products[0].stock, 42);
        assert_eq!(next.products[1].low_stock_threshold, 2);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let state = AppState::default();
        let rows = vec![
            ProductRow {
                sku: "BK-010".to_string(),
                name: "Muffin".to_string(),
                category: ProductCategory::Bakery,
                price: 20_000.0,
                cost: 7_000.0,
                stock: 5,
                low_stock_threshold: None,
            },
            ProductRow {
                sku: "bad sku".to_string(),
                name: "Broken".to_string(),
                category: ProductCategory::Other,
                price: 1.0,
                cost: 0.0,
                stock: 1,
                low_stock_threshold: None,
            },
        ];

        assert!(import_products(&state, rows).is_err());
        assert!(state.products.is_empty());
    }

    #[tokio::test]
    async fn test_load_more_pages_through_catalog() {
        let state = state_with(&[
            ("BK-001", "Croissant", 10),
            ("BK-002", "Banana Bread", 3),
            ("BK-003", "Pain au Chocolat", 30),
        ]);

        let first = load_more(&state, 0, 2, Duration::ZERO).await;
        let second = load_more(&state, 2, 2, Duration::from_millis(1)).await;
        let third = load_more(&state, 4, 2, Duration::ZERO).await;

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].sku, "BK-003");
        assert!(third.is_empty());
    }
}
