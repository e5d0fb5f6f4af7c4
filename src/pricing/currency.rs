use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// How amounts are rendered for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub code: String,
    pub symbol: String,
    /// Either 0 (whole units) or 2.
    pub decimals: u8,
    pub thousands_separator: char,
    pub decimal_separator: char,
    pub symbol_position: SymbolPosition,
}

impl CurrencyFormat {
    pub fn vnd() -> Self {
        Self {
            code: "VND".to_string(),
            symbol: "₫".to_string(),
            decimals: 0,
            thousands_separator: '.',
            decimal_separator: ',',
            symbol_position: SymbolPosition::Suffix,
        }
    }

    pub fn usd() -> Self {
        Self {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimals: 2,
            thousands_separator: ',',
            decimal_separator: '.',
            symbol_position: SymbolPosition::Prefix,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "VND" => Some(Self::vnd()),
            "USD" => Some(Self::usd()),
            _ => None,
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::vnd()
    }
}

pub fn format_currency(amount: f64, format: &CurrencyFormat) -> String {
    if !amount.is_finite() {
        return place_symbol(&amount.to_string(), format);
    }

    let decimals = format.decimals.min(2) as i32;
    let scale = 10f64.powi(decimals);
    let scaled = (amount.abs() * scale).round() as u64;
    let factor = 10u64.pow(decimals as u32);

    let mut digits = group_thousands(scaled / factor, format.thousands_separator);
    if decimals > 0 {
        digits.push(format.decimal_separator);
        digits.push_str(&format!(
            "{:0width$}",
            scaled % factor,
            width = decimals as usize
        ));
    }

    let body = place_symbol(&digits, format);
    if amount < 0.0 && scaled != 0 {
        format!("-{}", body)
    } else {
        body
    }
}

fn place_symbol(digits: &str, format: &CurrencyFormat) -> String {
    match format.symbol_position {
        SymbolPosition::Prefix => format!("{}{}", format.symbol, digits),
        SymbolPosition::Suffix => format!("{} {}", digits, format.symbol),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
