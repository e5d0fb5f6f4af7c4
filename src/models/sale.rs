use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::cart::CartLine;
use crate::pricing::Totals;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash { tendered: f64 },
    Card,
    Transfer,
    /// Charged to the attached customer's house account.
    Credit,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash { .. } => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Transfer => write!(f, "transfer"),
            PaymentMethod::Credit => write!(f, "credit"),
        }
    }
}

/// A completed checkout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sale {
    pub id: Uuid,
    pub number: u32,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub payment: PaymentMethod,
    pub change: f64,
    pub customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn receipt_number(&self) -> String {
        format!("S{:05}", self.number)
    }
}
