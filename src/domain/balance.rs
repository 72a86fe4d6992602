use serde::{Deserialize, Serialize};

use super::{Cents, CustomerId, EntryType, LedgerEntry, Payment};

/// Derived per-customer balance. Never persisted: recomputed from the full
/// entry and payment lists on every call, since the ledger store owns mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBalance {
    pub customer_id: CustomerId,
    pub total_credits: Cents,
    pub total_debits: Cents,
    pub total_payments: Cents,
    /// Signed: positive = customer owes the business, negative = the business
    /// owes the customer. Debits increase it, credits and payments decrease it.
    pub net_outstanding: Cents,
    pub entry_count: usize,
}

impl CustomerBalance {
    /// The all-zero balance of a customer with no ledger activity.
    pub fn zero(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            total_credits: 0,
            total_debits: 0,
            total_payments: 0,
            net_outstanding: 0,
            entry_count: 0,
        }
    }
}

/// Fold a customer's entries and payments into a balance.
///
/// All entries and payments must belong to `customer_id`; mixed-customer input
/// signals a caller bug and fails the whole computation. Empty input yields
/// the zero balance. The result does not depend on input ordering.
pub fn compute_balance(
    customer_id: CustomerId,
    entries: &[LedgerEntry],
    payments: &[Payment],
) -> Result<CustomerBalance, BalanceError> {
    let mut balance = CustomerBalance::zero(customer_id);

    for entry in entries {
        if entry.customer_id != customer_id {
            return Err(BalanceError::CrossCustomerData {
                expected: customer_id,
                found: entry.customer_id,
            });
        }
        if entry.amount_cents <= 0 {
            return Err(BalanceError::InvalidAmount {
                customer_id,
                amount_cents: entry.amount_cents,
            });
        }
        match entry.entry_type {
            EntryType::Credit => balance.total_credits += entry.amount_cents,
            EntryType::Debit => balance.total_debits += entry.amount_cents,
        }
        balance.entry_count += 1;
    }

    for payment in payments {
        if payment.customer_id != customer_id {
            return Err(BalanceError::CrossCustomerData {
                expected: customer_id,
                found: payment.customer_id,
            });
        }
        if payment.amount_cents <= 0 {
            return Err(BalanceError::InvalidAmount {
                customer_id,
                amount_cents: payment.amount_cents,
            });
        }
        balance.total_payments += payment.amount_cents;
    }

    balance.net_outstanding = balance.total_debits - balance.total_credits - balance.total_payments;
    Ok(balance)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceError {
    /// Entries or payments from another customer were mixed into the input.
    CrossCustomerData {
        expected: CustomerId,
        found: CustomerId,
    },
    /// A stored amount is not a positive number of cents.
    InvalidAmount {
        customer_id: CustomerId,
        amount_cents: Cents,
    },
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::CrossCustomerData { expected, found } => {
                write!(
                    f,
                    "ledger data mixes customers: expected {}, found {}",
                    expected, found
                )
            }
            BalanceError::InvalidAmount {
                customer_id,
                amount_cents,
            } => {
                write!(
                    f,
                    "invalid amount {} cents in ledger of customer {}",
                    amount_cents, customer_id
                )
            }
        }
    }
}

impl std::error::Error for BalanceError {}
