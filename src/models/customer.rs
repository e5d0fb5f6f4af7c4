use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A customer with a house account. `credit_balance` is what the customer
/// currently owes the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub credit_balance: f64,
    pub created_at: DateTime<Utc>,
}

lazy_static::lazy_static! {
    pub(crate) static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 .-]{5,19}$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreCustomerRequest {
    #[validate(length(min = 1, max = 80, message = "Name must be 1-80 characters"))]
    pub name: String,

    #[validate(regex(path = "PHONE_REGEX", message = "Invalid phone number"))]
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(request: StoreCustomerRequest) -> Result<Self, validator::ValidationErrors> {
        request.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            phone: request.phone.map(|p| p.trim().to_string()),
            credit_balance: 0.0,
            created_at: Utc::now(),
        })
    }

    pub fn has_outstanding_credit(&self) -> bool {
        self.credit_balance > 0.0
    }
}
