use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::product::Product;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// A discount applied either to a single cart line or once to the whole order.
///
/// `value` is a percentage (0-100) for [`DiscountKind::Percentage`] and a flat
/// currency amount for [`DiscountKind::Fixed`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: f64,
}

impl Discount {
    pub fn percentage(value: f64) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            value,
        }
    }
}

impl std::fmt::Display for Discount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            DiscountKind::Percentage => write!(f, "{}%", self.value),
            DiscountKind::Fixed => write!(f, "-{}", self.value),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_discount: Option<Discount>,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            line_discount: None,
        }
    }

    /// A line that is not tied to a catalog product, used for quotes.
    pub fn priced(unit_price: f64, quantity: u32) -> Self {
        Self {
            product_id: Uuid::nil(),
            sku: String::new(),
            name: String::new(),
            unit_price,
            quantity,
            line_discount: None,
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.line_discount = Some(discount);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub order_discount: Option<Discount>,
    pub surcharge: f64,
    pub customer_id: Option<Uuid>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: &Uuid) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == *product_id)
            .map(|line| line.quantity)
            .sum()
    }

    pub fn position_of(&self, product_id: &Uuid) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == *product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = Cart {
            lines: vec![CartLine::priced(10.0, 2), CartLine::priced(5.0, 3)],
            ..Default::default()
        };
        assert_eq!(cart.item_count(), 5);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_discount_display() {
        assert_eq!(Discount::percentage(10.0).to_string(), "10%");
        assert_eq!(Discount::fixed(5000.0).to_string(), "-5000");
    }
}
