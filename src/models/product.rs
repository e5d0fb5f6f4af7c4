use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Coffee,
    Tea,
    Bakery,
    Snack,
    Meal,
    Beverage,
    Grocery,
    Other,
}

/// Presentation variant for a product tile. The rendering layer decides how
/// each variant is drawn; the data model only carries the tag.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ProductIcon {
    Cup,
    Leaf,
    Croissant,
    Cookie,
    Bowl,
    Bottle,
    Basket,
    Generic,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Other
    }
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 8] = [
        ProductCategory::Coffee,
        ProductCategory::Tea,
        ProductCategory::Bakery,
        ProductCategory::Snack,
        ProductCategory::Meal,
        ProductCategory::Beverage,
        ProductCategory::Grocery,
        ProductCategory::Other,
    ];

    pub fn default_icon(&self) -> ProductIcon {
        match self {
            ProductCategory::Coffee => ProductIcon::Cup,
            ProductCategory::Tea => ProductIcon::Leaf,
            ProductCategory::Bakery => ProductIcon::Croissant,
            ProductCategory::Snack => ProductIcon::Cookie,
            ProductCategory::Meal => ProductIcon::Bowl,
            ProductCategory::Beverage => ProductIcon::Bottle,
            ProductCategory::Grocery => ProductIcon::Basket,
            ProductCategory::Other => ProductIcon::Generic,
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductCategory::Coffee => write!(f, "coffee"),
            ProductCategory::Tea => write!(f, "tea"),
            ProductCategory::Bakery => write!(f, "bakery"),
            ProductCategory::Snack => write!(f, "snack"),
            ProductCategory::Meal => write!(f, "meal"),
            ProductCategory::Beverage => write!(f, "beverage"),
            ProductCategory::Grocery => write!(f, "grocery"),
            ProductCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.to_string() == normalized)
            .ok_or_else(|| format!("Unknown product category '{}'", value.trim()))
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "in stock"),
            StockStatus::LowStock => write!(f, "low stock"),
            StockStatus::OutOfStock => write!(f, "out of stock"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
    pub cost: f64,
    pub stock: u32,
    pub low_stock_threshold: u32,
    pub icon: ProductIcon,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

lazy_static::lazy_static! {
    static ref SKU_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]*$").unwrap();
}

// request dto
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreProductRequest {
    #[validate(regex(
        path = "SKU_REGEX",
        message = "SKU may only contain uppercase letters, digits and dashes"
    ))]
    #[validate(length(min = 1, max = 32, message = "SKU must be 1-32 characters"))]
    pub sku: String,

    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[validate(custom = "validate_name")]
    pub name: String,

    pub category: ProductCategory,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub cost: f64,

    pub stock: u32,

    pub low_stock_threshold: Option<u32>,

    pub icon: Option<ProductIcon>,

    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[validate(custom = "validate_single_line")]
    pub name: Option<String>,

    pub category: Option<ProductCategory>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub cost: Option<f64>,

    pub low_stock_threshold: Option<u32>,

    pub icon: Option<ProductIcon>,

    pub supplier_id: Option<Uuid>,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Name is required"));
    }
    validate_single_line(name)
}

fn validate_single_line(name: &str) -> Result<(), ValidationError> {
    if name.contains(['\n', '\r']) {
        return Err(ValidationError::new("Name must be a single line"));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Product {
    pub fn new(request: StoreProductRequest, default_threshold: u32) -> Result<Self, ProductError> {
        request.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            sku: request.sku.trim().to_string(),
            name: request.name.trim().to_string(),
            category: request.category,
            price: request.price,
            cost: request.cost,
            stock: request.stock,
            low_stock_threshold: request.low_stock_threshold.unwrap_or(default_threshold),
            icon: request
                .icon
                .unwrap_or_else(|| request.category.default_icon()),
            supplier_id: request.supplier_id,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.stock == 0 {
            StockStatus::OutOfStock
        } else if self.stock <= self.low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn is_low_stock(&self) -> bool {
        !matches!(self.stock_status(), StockStatus::InStock)
    }

    /// Gross margin per unit as a percentage of the selling price.
    pub fn margin_percent(&self) -> Option<f64> {
        if self.price > 0.0 {
            Some((self.price - self.cost) / self.price * 100.0)
        } else {
            None
        }
    }

    pub fn update(&mut self, request: UpdateProductRequest) {
        let mut updated = false;

        if let Some(name) = request.name {
            if !name.trim().is_empty() && self.name != name.trim() {
                self.name = name.trim().to_string();
                updated = true;
            }
        }

        if let Some(category) = request.category {
            if self.category != category {
                self.category = category;
                updated = true;
            }
        }

        if let Some(price) = request.price {
            if self.price != price {
                self.price = price;
                updated = true;
            }
        }

        if let Some(cost) = request.cost {
            if self.cost != cost {
                self.cost = cost;
                updated = true;
            }
        }

        if let Some(threshold) = request.low_stock_threshold {
            if self.low_stock_threshold != threshold {
                self.low_stock_threshold = threshold;
                updated = true;
            }
        }

        if let Some(icon) = request.icon {
            if self.icon != icon {
                self.icon = icon;
                updated = true;
            }
        }

        if request.supplier_id.is_some() && self.supplier_id != request.supplier_id {
            self.supplier_id = request.supplier_id;
            updated = true;
        }

        if updated {
            self.updated_at = Utc::now();
        }
    }
}

// Product filter for catalog queries
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    pub stock_status: Option<StockStatus>,
    pub search_term: Option<String>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = Some(status);
        self
    }

    pub fn with_search(mut self, term: String) -> Self {
        self.search_term = Some(term);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }

        if let Some(status) = self.stock_status {
            if product.stock_status() != status {
                return false;
            }
        }

        if let Some(ref term) = self.search_term {
            let term_lower = term.trim().to_lowercase();
            if !term_lower.is_empty()
                && !product.name.to_lowercase().contains(&term_lower)
                && !product.sku.to_lowercase().contains(&term_lower)
            {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sku: &str, name: &str, price: f64) -> StoreProductRequest {
        StoreProductRequest {
            sku: sku.to_string(),
            name: name.to_string(),
            category: ProductCategory::Coffee,
            price,
            cost: 10_000.0,
            stock: 20,
            low_stock_threshold: None,
            icon: None,
            supplier_id: None,
        }
    }

    #[test]
    fn test_new_product_uses_defaults() {
        let product = Product::new(request("CF-001", "  Iced Milk Coffee ", 35_000.0), 5).unwrap();
        assert_eq!(product.name, "Iced Milk Coffee");
        assert_eq!(product.low_stock_threshold, 5);
        assert_eq!(product.icon, ProductIcon::Cup);
    }

    #[test]
    fn test_invalid_sku_rejected() {
        assert!(Product::new(request("cf 001", "Coffee", 35_000.0), 5).is_err());
        assert!(Product::new(request("", "Coffee", 35_000.0), 5).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Product::new(request("CF-001", "Coffee", -1.0), 5).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(Product::new(request("CF-001", "   ", 35_000.0), 5).is_err());
    }

    #[test]
    fn test_stock_status_thresholds() {
        let mut product = Product::new(request("CF-001", "Coffee", 35_000.0), 5).unwrap();
        assert_eq!(product.stock_status(), StockStatus::InStock);
        product.stock = 5;
        assert_eq!(product.stock_status(), StockStatus::LowStock);
        product.stock = 0;
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_update_ignores_blank_name() {
        let mut product = Product::new(request("CF-001", "Coffee", 35_000.0), 5).unwrap();
        product.update(UpdateProductRequest {
            name: Some("  ".to_string()),
            price: Some(39_000.0),
            ..Default::default()
        });
        assert_eq!(product.name, "Coffee");
        assert_eq!(product.price, 39_000.0);
    }

    #[test]
    fn test_update_request_rejects_multiline_name() {
        let request = UpdateProductRequest {
            name: Some("Iced Coffee\nCF-999,Injected,1".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateProductRequest {
            name: Some("Iced Coffee (L)".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Bakery".parse::<ProductCategory>(), Ok(ProductCategory::Bakery));
        assert!("furniture".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_filter_matches_sku_and_name() {
        let product = Product::new(request("CF-001", "Iced Milk Coffee", 35_000.0), 5).unwrap();
        assert!(ProductFilter::new().with_search("milk".to_string()).matches(&product));
        assert!(ProductFilter::new().with_search("cf-0".to_string()).matches(&product));
        assert!(!ProductFilter::new()
            .with_category(ProductCategory::Tea)
            .matches(&product));
    }
}
