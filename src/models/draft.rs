use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::cart::Cart;

/// A cart snapshot parked for later, keyed by id and creation time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DraftOrder {
    pub id: Uuid,
    pub label: String,
    pub cart: Cart,
    pub created_at: DateTime<Utc>,
}

impl DraftOrder {
    pub fn new(label: String, cart: Cart, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            cart,
            created_at,
        }
    }
}
