use thiserror::Error;

use crate::domain::{BalanceError, Cents, CustomerId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer already exists: {0}")]
    CustomerAlreadyExists(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Ledger data mixes customers: expected {expected}, found {found}")]
    CrossCustomerData {
        expected: CustomerId,
        found: CustomerId,
    },

    #[error("Invalid stored amount {amount_cents} for customer {customer_id}")]
    CorruptLedger {
        customer_id: CustomerId,
        amount_cents: Cents,
    },

    #[error("Invalid dispatch report: {0}")]
    BadDispatchReport(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::CrossCustomerData { expected, found } => {
                AppError::CrossCustomerData { expected, found }
            }
            BalanceError::InvalidAmount {
                customer_id,
                amount_cents,
            } => AppError::CorruptLedger {
                customer_id,
                amount_cents,
            },
        }
    }
}
