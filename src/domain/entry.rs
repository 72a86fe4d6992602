use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BusinessId, Cents, CustomerId, UserId};

pub type EntryId = Uuid;
pub type PaymentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Reduces the amount the customer owes the business
    Credit,
    /// Increases the amount the customer owes the business
    Debit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Credit => "credit",
            EntryType::Debit => "debit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" => Some(EntryType::Credit),
            "debit" => Some(EntryType::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single credit or debit line in a customer's ledger.
/// Entries are append-only: corrections are recorded as new entries, and every
/// balance computation receives the full entry list fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub customer_id: CustomerId,
    pub business_id: BusinessId,
    pub entry_type: EntryType,
    /// Amount in cents, always positive; the direction lives in `entry_type`
    pub amount_cents: Cents,
    pub description: Option<String>,
    /// Receipt or invoice photo attached by the person recording the entry
    pub image_url: Option<String>,
    pub created_by_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create a new ledger entry. Non-positive amounts are rejected at
    /// ingestion rather than coerced.
    pub fn new(
        customer_id: CustomerId,
        business_id: BusinessId,
        entry_type: EntryType,
        amount_cents: Cents,
        created_by_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, InvalidAmount> {
        if amount_cents <= 0 {
            return Err(InvalidAmount { amount_cents });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id,
            business_id,
            entry_type,
            amount_cents,
            description: None,
            image_url: None,
            created_by_id,
            created_at,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "bank_transfer" | "bank-transfer" | "transfer" => Some(PaymentMethod::BankTransfer),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded payment against a customer's outstanding (payable) balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub customer_id: CustomerId,
    pub business_id: BusinessId,
    pub amount_cents: Cents,
    pub method: PaymentMethod,
    /// External reference: receipt number, bank transaction id, etc.
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        customer_id: CustomerId,
        business_id: BusinessId,
        amount_cents: Cents,
        method: PaymentMethod,
        created_at: DateTime<Utc>,
    ) -> Result<Self, InvalidAmount> {
        if amount_cents <= 0 {
            return Err(InvalidAmount { amount_cents });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id,
            business_id,
            amount_cents,
            method,
            reference: None,
            created_at,
        })
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A ledger amount that is not a positive number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAmount {
    pub amount_cents: Cents,
}

impl std::fmt::Display for InvalidAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "amount must be a positive number of cents, got {}",
            self.amount_cents
        )
    }
}

impl std::error::Error for InvalidAmount {}
