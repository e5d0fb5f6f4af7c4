use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::customer::{Customer, StoreCustomerRequest},
    store::AppState,
};

#[derive(Error, Debug)]
pub enum CustomerError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Payment amount must be a positive number")]
    InvalidAmount,

    #[error("Payment of {amount} exceeds the outstanding balance of {balance}")]
    Overpayment { balance: f64, amount: f64 },
}

pub fn add_customer(state: &AppState, request: StoreCustomerRequest) -> Result<AppState, CustomerError> {
    let customer = Customer::new(request).map_err(|e| CustomerError::ValidationError {
        message: format!("Customer validation failed: {}", e),
    })?;

    info!("Added customer '{}' ({})", customer.name, customer.id);
    let mut next = state.clone();
    next.customers.push(customer);
    Ok(next)
}

/// Records a payment against a customer's house account.
pub fn settle_credit(state: &AppState, customer_id: &Uuid, amount: f64) -> Result<AppState, CustomerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CustomerError::InvalidAmount);
    }

    let mut next = state.clone();
    let customer = next
        .customer_mut(customer_id)
        .ok_or(CustomerError::CustomerNotFound)?;

    if amount > customer.credit_balance {
        return Err(CustomerError::Overpayment {
            balance: customer.credit_balance,
            amount,
        });
    }

    customer.credit_balance -= amount;
    info!(
        "Customer '{}' paid {} (balance now {})",
        customer.name, amount, customer.credit_balance
    );
    Ok(next)
}

/// Customers whose name or phone contains `term`.
pub fn search<'a>(state: &'a AppState, term: &str) -> Vec<&'a Customer> {
    let term = term.trim().to_lowercase();
    state
        .customers
        .iter()
        .filter(|customer| {
            term.is_empty()
                || customer.name.to_lowercase().contains(&term)
                || customer
                    .phone
                    .as_ref()
                    .map(|p| p.contains(&term))
                    .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        add_customer(
            &AppState::default(),
            StoreCustomerRequest {
                name: "Nguyen Van An".to_string(),
                phone: Some("0909123456".to_string()),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_settle_credit_reduces_balance() {
        let mut state = state();
        state.customers[0].credit_balance = 120_000.0;
        let id = state.customers[0].id;

        let next = settle_credit(&state, &id, 20_000.0).unwrap();
        assert_eq!(next.customers[0].credit_balance, 100_000.0);
    }

    #[test]
    fn test_settle_credit_rejects_overpayment() {
        let mut state = state();
        state.customers[0].credit_balance = 10_000.0;
        let id = state.customers[0].id;

        assert!(matches!(
            settle_credit(&state, &id, 20_000.0),
            Err(CustomerError::Overpayment { .. })
        ));
        assert!(matches!(
            settle_credit(&state, &id, -5.0),
            Err(CustomerError::InvalidAmount)
        ));
    }

    #[test]
    fn test_search_by_name_or_phone() {
        let state = state();
        assert_eq!(search(&state, "van an").len(), 1);
        assert_eq!(search(&state, "0909").len(), 1);
        assert!(search(&state, "tran").is_empty());
    }
}
