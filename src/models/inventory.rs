use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentReason {
    Restock,
    Damage,
    Correction,
    Sale,
    Return,
}

impl std::fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentReason::Restock => write!(f, "restock"),
            AdjustmentReason::Damage => write!(f, "damage"),
            AdjustmentReason::Correction => write!(f, "correction"),
            AdjustmentReason::Sale => write!(f, "sale"),
            AdjustmentReason::Return => write!(f, "return"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StockAdjustment {
    pub id: Uuid,
    pub product_id: Uuid,
    pub delta: i64,
    pub reason: AdjustmentReason,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockAdjustment {
    pub fn new(
        product_id: Uuid,
        delta: i64,
        reason: AdjustmentReason,
        note: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            delta,
            reason,
            note,
            created_at,
        }
    }
}
