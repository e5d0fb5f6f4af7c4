use regex::Regex;
use thiserror::Error;

use crate::models::cart::{CartLine, Discount};

lazy_static::lazy_static! {
    static ref QUOTE_LINE_REGEX: Regex =
        Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*[xX*]\s*([0-9]+)\s*(?:@\s*([0-9.]+%?))?\s*$").unwrap();
}

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("'{0}' is not a quote line, expected PRICExQTY or PRICExQTY@DISCOUNT")]
    InvalidQuoteLine(String),

    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

/// Reads a non-negative amount. Blank, negative or unparsable text is `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// `"10%"` is a percentage discount, `"5000"` a fixed one. Anything blank,
/// zero, negative or unparsable means no discount.
pub fn parse_discount(input: &str) -> Option<Discount> {
    let input = input.trim();
    let discount = match input.strip_suffix('%') {
        Some(percent) => Discount::percentage(parse_amount(percent)?),
        None => Discount::fixed(parse_amount(input)?),
    };

    if discount.value > 0.0 {
        Some(discount)
    } else {
        None
    }
}

/// Parses a line such as `35000x2` or `100000x1@10%` into a cart line with
/// no product behind it.
pub fn parse_quote_line(input: &str) -> Result<CartLine, InputError> {
    let captures = QUOTE_LINE_REGEX
        .captures(input)
        .ok_or_else(|| InputError::InvalidQuoteLine(input.to_string()))?;

    let price = parse_amount(&captures[1])
        .ok_or_else(|| InputError::InvalidQuoteLine(input.to_string()))?;
    let quantity: u32 = captures[2]
        .parse()
        .map_err(|_| InputError::InvalidQuoteLine(input.to_string()))?;
    if quantity == 0 {
        return Err(InputError::ZeroQuantity);
    }

    let line = CartLine::priced(price, quantity);
    Ok(match captures.get(3).and_then(|m| parse_discount(m.as_str())) {
        Some(discount) => line.with_discount(discount),
        None => line,
    })
}
