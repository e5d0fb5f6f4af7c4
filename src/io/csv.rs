use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::product::{Product, ProductCategory, StoreProductRequest};

pub const PRODUCT_HEADER: [&str; 7] = [
    "sku",
    "name",
    "category",
    "price",
    "cost",
    "stock",
    "low_stock_threshold",
];

const REQUIRED_COLUMNS: [&str; 3] = ["sku", "name", "price"];

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Line {line}: invalid {column} '{value}'")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Product {sku}: {field} contains a comma and cannot be exported")]
    EmbeddedDelimiter { sku: String, field: String },

    #[error("File has no header row")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One product as it appears in a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub sku: String,
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
    pub cost: f64,
    pub stock: u32,
    pub low_stock_threshold: Option<u32>,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            cost: product.cost,
            stock: product.stock,
            low_stock_threshold: Some(product.low_stock_threshold),
        }
    }
}

impl From<ProductRow> for StoreProductRequest {
    fn from(row: ProductRow) -> Self {
        Self {
            sku: row.sku,
            name: row.name,
            category: row.category,
            price: row.price,
            cost: row.cost,
            stock: row.stock,
            low_stock_threshold: row.low_stock_threshold,
            icon: None,
            supplier_id: None,
        }
    }
}

/// Renders products as CSV text. Fields are written unquoted, so a name
/// containing a comma is refused instead of producing a shifted row.
pub fn export_products(products: &[Product]) -> Result<String, CsvError> {
    let mut out = PRODUCT_HEADER.join(",");
    out.push('\n');

    for product in products {
        for (field, value) in [("sku", &product.sku), ("name", &product.name)] {
            if value.contains(',') {
                return Err(CsvError::EmbeddedDelimiter {
                    sku: product.sku.clone(),
                    field: field.to_string(),
                });
            }
        }

        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            product.sku,
            product.name,
            product.category,
            product.price,
            product.cost,
            product.stock,
            product.low_stock_threshold
        ));
    }

    debug!("Exported {} products to CSV", products.len());
    Ok(out)
}

/// Parses CSV text into product rows. Columns are matched by header name in
/// any order and unknown columns are ignored. Rows are split on every comma.
pub fn parse_products(text: &str) -> Result<Vec<ProductRow>, CsvError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header_line) = lines.next().ok_or(CsvError::Empty)?;
    let header: Vec<String> = header_line
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .collect();

    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(CsvError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for (line, text) in lines {
        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        if fields.len() != header.len() {
            return Err(CsvError::ColumnCount {
                line,
                expected: header.len(),
                found: fields.len(),
            });
        }

        let field = |name: &str| columns.get(name).map(|&index| fields[index]);
        rows.push(ProductRow {
            sku: field("sku").unwrap_or_default().to_string(),
            name: field("name").unwrap_or_default().to_string(),
            category: parse_field(line, "category", field("category"))?.unwrap_or_default(),
            price: parse_field(line, "price", field("price"))?.unwrap_or_default(),
            cost: parse_field(line, "cost", field("cost"))?.unwrap_or_default(),
            stock: parse_field(line, "stock", field("stock"))?.unwrap_or_default(),
            low_stock_threshold: parse_field(
                line,
                "low_stock_threshold",
                field("low_stock_threshold"),
            )?,
        });
    }

    debug!("Parsed {} product rows", rows.len());
    Ok(rows)
}

// Absent column or empty cell is None.
fn parse_field<T: std::str::FromStr>(
    line: usize,
    column: &str,
    value: Option<&str>,
) -> Result<Option<T>, CsvError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| CsvError::Parse {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

pub async fn write_products(path: impl AsRef<Path>, products: &[Product]) -> Result<(), CsvError> {
    let text = export_products(products)?;
    tokio::fs::write(path.as_ref(), text).await?;
    info!(
        "Wrote {} products to {}",
        products.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub async fn read_products(path: impl AsRef<Path>) -> Result<Vec<ProductRow>, CsvError> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    let rows = parse_products(&text)?;
    info!("Read {} rows from {}", rows.len(), path.as_ref().display());
    Ok(rows)
}
