use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CustomerId = Uuid;
pub type BusinessId = Uuid;
pub type UserId = Uuid;

/// The business whose books a database holds. `owner_id` identifies the
/// operator recording entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Business {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}

/// A customer of a business. Every customer belongs to exactly one business;
/// `business_id` is fixed at creation and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub business_id: BusinessId,
    /// Free-form tag like "regular", "wholesale", "supplier"
    pub relationship_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, business_id: BusinessId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: None,
            phone_number: None,
            business_id,
            relationship_type: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_relationship_type(mut self, relationship_type: impl Into<String>) -> Self {
        self.relationship_type = Some(relationship_type.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
