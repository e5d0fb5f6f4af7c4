use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::customer::PHONE_REGEX;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreSupplierRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(max = 80, message = "Contact name must be less than 80 characters"))]
    pub contact_name: Option<String>,

    #[validate(regex(path = "PHONE_REGEX", message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl Supplier {
    pub fn new(request: StoreSupplierRequest) -> Result<Self, validator::ValidationErrors> {
        request.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            contact_name: request.contact_name.map(|c| c.trim().to_string()),
            phone: request.phone,
            email: request.email,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOrderStatus {
    Draft,
    Ordered,
    Received,
    Cancelled,
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseOrderStatus::Draft => write!(f, "draft"),
            PurchaseOrderStatus::Ordered => write!(f, "ordered"),
            PurchaseOrderStatus::Received => write!(f, "received"),
            PurchaseOrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl PurchaseOrderStatus {
    /// Draft -> Ordered -> Received, with Cancelled reachable until receipt.
    pub fn can_transition_to(&self, next: PurchaseOrderStatus) -> bool {
        matches!(
            (self, next),
            (PurchaseOrderStatus::Draft, PurchaseOrderStatus::Ordered)
                | (PurchaseOrderStatus::Ordered, PurchaseOrderStatus::Received)
                | (PurchaseOrderStatus::Draft, PurchaseOrderStatus::Cancelled)
                | (PurchaseOrderStatus::Ordered, PurchaseOrderStatus::Cancelled)
        )
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Draft | PurchaseOrderStatus::Ordered
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PurchaseItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_cost: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub items: Vec<PurchaseItem>,
    pub status: PurchaseOrderStatus,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub fn new(supplier_id: Uuid, items: Vec<PurchaseItem>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            supplier_id,
            items,
            status: PurchaseOrderStatus::Draft,
            created_at,
            received_at: None,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_cost * item.quantity as f64)
            .sum()
    }

    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use PurchaseOrderStatus::*;
        assert!(Draft.can_transition_to(Ordered));
        assert!(Ordered.can_transition_to(Received));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(!Draft.can_transition_to(Received));
        assert!(!Received.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Ordered));
    }

    #[test]
    fn test_total_cost() {
        let order = PurchaseOrder::new(
            Uuid::new_v4(),
            vec![
                PurchaseItem {
                    product_id: Uuid::new_v4(),
                    quantity: 10,
                    unit_cost: 12_000.0,
                },
                PurchaseItem {
                    product_id: Uuid::new_v4(),
                    quantity: 4,
                    unit_cost: 5_000.0,
                },
            ],
            Utc::now(),
        );
        assert_eq!(order.total_cost(), 140_000.0);
        assert_eq!(order.unit_count(), 14);
    }

    #[test]
    fn test_supplier_email_validated() {
        let result = Supplier::new(StoreSupplierRequest {
            name: "Highland Beans".to_string(),
            contact_name: None,
            phone: None,
            email: Some("not-an-email".to_string()),
        });
        assert!(result.is_err());
    }
}
