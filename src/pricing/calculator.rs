//! Order total calculation.
//!
//! Everything here is a pure function of its inputs. Amounts are carried as
//! `f64` without intermediate rounding; rounding happens only when a value is
//! formatted for display. Discounts are not clamped, so a fixed discount larger
//! than the amount it applies to yields a negative result.

use serde::{Deserialize, Serialize};

use crate::models::cart::{Cart, CartLine, Discount, DiscountKind};

/// Flat sales tax applied to the discounted subtotal.
pub const TAX_RATE: f64 = 0.10;

/// Monetary breakdown of an order. Always derived from cart lines, never
/// stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub tax: f64,
    pub surcharge: f64,
    pub total: f64,
}

impl Totals {
    pub fn for_cart(cart: &Cart) -> Self {
        compute_order_totals(&cart.lines, cart.order_discount.as_ref(), cart.surcharge)
    }
}

/// Amount a discount takes off `base`.
pub fn discount_amount(discount: Option<&Discount>, base: f64) -> f64 {
    match discount {
        Some(Discount {
            kind: DiscountKind::Percentage,
            value,
        }) => base * value / 100.0,
        Some(Discount {
            kind: DiscountKind::Fixed,
            value,
        }) => *value,
        None => 0.0,
    }
}

pub fn compute_line_total(line: &CartLine) -> f64 {
    let line_subtotal = line.unit_price * line.quantity as f64;
    line_subtotal - discount_amount(line.line_discount.as_ref(), line_subtotal)
}

pub fn compute_order_totals(
    lines: &[CartLine],
    order_discount: Option<&Discount>,
    surcharge: f64,
) -> Totals {
    let subtotal: f64 = lines.iter().map(compute_line_total).sum();
    let discount_amount = discount_amount(order_discount, subtotal);
    let tax = (subtotal - discount_amount) * TAX_RATE;

    Totals {
        subtotal,
        discount_amount,
        tax,
        surcharge,
        total: subtotal - discount_amount + tax + surcharge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_without_discount() {
        for (price, quantity) in [(0.0, 1), (35_000.0, 2), (12.5, 7), (99_999.0, 40)] {
            let line = CartLine::priced(price, quantity);
            assert_eq!(compute_line_total(&line), price * quantity as f64);
        }
    }

    #[test]
    fn test_line_total_with_percentage_discount() {
        let line = CartLine::priced(50_000.0, 3).with_discount(Discount::percentage(20.0));
        let expected = 50_000.0 * 3.0 * (1.0 - 20.0 / 100.0);
        assert!((compute_line_total(&line) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_line_total_with_fixed_discount() {
        let line = CartLine::priced(50_000.0, 2).with_discount(Discount::fixed(15_000.0));
        assert_eq!(compute_line_total(&line), 85_000.0);
    }

    #[test]
    fn test_fixed_discount_larger_than_line_goes_negative() {
        let line = CartLine::priced(10_000.0, 1).with_discount(Discount::fixed(25_000.0));
        assert_eq!(compute_line_total(&line), -15_000.0);
    }

    #[test]
    fn test_order_totals_without_discount() {
        let lines = vec![CartLine::priced(35_000.0, 2)];
        let totals = compute_order_totals(&lines, None, 0.0);

        assert_eq!(totals.subtotal, 70_000.0);
        assert_eq!(totals.discount_amount, 0.0);
        assert_eq!(totals.tax, 7_000.0);
        assert_eq!(totals.total, 77_000.0);
    }

    #[test]
    fn test_order_totals_with_percentage_order_discount() {
        let lines = vec![CartLine::priced(100_000.0, 1)];
        let discount = Discount::percentage(10.0);
        let totals = compute_order_totals(&lines, Some(&discount), 0.0);

        assert_eq!(totals.discount_amount, 10_000.0);
        assert_eq!(totals.tax, 9_000.0);
        assert_eq!(totals.total, 99_000.0);
    }

    #[test]
    fn test_order_totals_with_fixed_discount_and_surcharge() {
        let lines = vec![CartLine::priced(40_000.0, 2), CartLine::priced(20_000.0, 1)];
        let discount = Discount::fixed(10_000.0);
        let totals = compute_order_totals(&lines, Some(&discount), 5_000.0);

        assert_eq!(totals.subtotal, 100_000.0);
        assert_eq!(totals.discount_amount, 10_000.0);
        assert_eq!(totals.tax, 9_000.0);
        assert_eq!(totals.surcharge, 5_000.0);
        assert_eq!(totals.total, 104_000.0);
    }

    #[test]
    fn test_order_discount_is_not_clamped() {
        let lines = vec![CartLine::priced(10_000.0, 1)];
        let discount = Discount::fixed(30_000.0);
        let totals = compute_order_totals(&lines, Some(&discount), 0.0);

        assert_eq!(totals.discount_amount, 30_000.0);
        assert_eq!(totals.tax, -2_000.0);
        assert_eq!(totals.total, -22_000.0);
    }

    #[test]
    fn test_totals_invariants_hold() {
        let lines = vec![
            CartLine::priced(45_000.0, 3).with_discount(Discount::percentage(5.0)),
            CartLine::priced(12_000.0, 1).with_discount(Discount::fixed(2_000.0)),
            CartLine::priced(8_000.0, 4),
        ];
        let discount = Discount::percentage(12.5);
        let totals = compute_order_totals(&lines, Some(&discount), 3_000.0);

        let expected_total =
            totals.subtotal - totals.discount_amount + totals.tax + totals.surcharge;
        let expected_tax = (totals.subtotal - totals.discount_amount) * TAX_RATE;
        assert!((totals.total - expected_total).abs() < 1e-9);
        assert!((totals.tax - expected_tax).abs() < 1e-9);
        assert!(totals.discount_amount >= 0.0);
    }

    #[test]
    fn test_order_totals_are_additive_over_lines() {
        let a = CartLine::priced(30_000.0, 2).with_discount(Discount::fixed(4_000.0));
        let b = CartLine::priced(15_000.0, 4).with_discount(Discount::percentage(25.0));
        let discount = Discount::percentage(10.0);

        let combined = compute_order_totals(&[a.clone(), b.clone()], Some(&discount), 2_000.0);
        let merged_subtotal = compute_line_total(&a) + compute_line_total(&b);
        let merged = compute_order_totals(
            &[CartLine::priced(merged_subtotal, 1)],
            Some(&discount),
            2_000.0,
        );

        assert_eq!(combined, merged);
    }

    #[test]
    fn test_order_totals_are_idempotent() {
        let lines = vec![
            CartLine::priced(27_500.0, 3).with_discount(Discount::percentage(7.0)),
            CartLine::priced(9_900.0, 2),
        ];
        let discount = Discount::fixed(1_500.0);

        let first = compute_order_totals(&lines, Some(&discount), 1_000.0);
        let second = compute_order_totals(&lines, Some(&discount), 1_000.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let totals = compute_order_totals(&[], None, 0.0);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_nan_input_propagates() {
        let lines = vec![CartLine::priced(f64::NAN, 1), CartLine::priced(10_000.0, 1)];
        let totals = compute_order_totals(&lines, None, 0.0);
        assert!(totals.subtotal.is_nan());
        assert!(totals.total.is_nan());
    }

    #[test]
    fn test_for_cart_uses_cart_discount_and_surcharge() {
        let cart = Cart {
            lines: vec![CartLine::priced(100_000.0, 1)],
            order_discount: Some(Discount::percentage(10.0)),
            surcharge: 1_000.0,
            customer_id: None,
        };
        assert_eq!(Totals::for_cart(&cart).total, 100_000.0);
    }
}
