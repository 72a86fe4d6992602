use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Business, BusinessId, Customer, CustomerId, EntryType, LedgerEntry, Payment, PaymentMethod,
};

use super::MIGRATION_001_INITIAL;

/// Repository over the ledger store: businesses, customers, entries, payments.
/// Entries and payments are append-only; there are no update statements here.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Business operations
    // ========================

    pub async fn save_business(&self, business: &Business) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO businesses (id, name, owner_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(business.id.to_string())
        .bind(&business.name)
        .bind(business.owner_id.to_string())
        .bind(business.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save business")?;
        Ok(())
    }

    /// The business this database belongs to. One database, one business.
    pub async fn get_business(&self) -> Result<Option<Business>> {
        let row = sqlx::query("SELECT id, name, owner_id, created_at FROM businesses LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch business")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_business(&row)?)),
            None => Ok(None),
        }
    }

    // ========================
    // Customer operations
    // ========================

    pub async fn save_customer(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers
                (id, name, email, phone_number, business_id, relationship_type, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone_number)
        .bind(customer.business_id.to_string())
        .bind(&customer.relationship_type)
        .bind(&customer.notes)
        .bind(customer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save customer")?;
        Ok(())
    }

    pub async fn get_customer_by_name(
        &self,
        business_id: BusinessId,
        name: &str,
    ) -> Result<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone_number, business_id, relationship_type, notes, created_at
            FROM customers
            WHERE business_id = ? AND name = ?
            "#,
        )
        .bind(business_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch customer by name")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_customer(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_customers(&self, business_id: BusinessId) -> Result<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, phone_number, business_id, relationship_type, notes, created_at
            FROM customers
            WHERE business_id = ?
            ORDER BY name, id
            "#,
        )
        .bind(business_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list customers")?;

        rows.iter().map(Self::row_to_customer).collect()
    }

    // ========================
    // Ledger entry operations
    // ========================

    pub async fn save_entry(&self, entry: &LedgerEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries
                (id, customer_id, business_id, entry_type, amount_cents,
                 description, image_url, created_by_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.customer_id.to_string())
        .bind(entry.business_id.to_string())
        .bind(entry.entry_type.as_str())
        .bind(entry.amount_cents)
        .bind(&entry.description)
        .bind(&entry.image_url)
        .bind(entry.created_by_id.to_string())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save ledger entry")?;
        Ok(())
    }

    /// A customer's entries in recorded order.
    pub async fn list_entries_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, business_id, entry_type, amount_cents,
                   description, image_url, created_by_id, created_at
            FROM ledger_entries
            WHERE customer_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list ledger entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    pub async fn list_entries(&self, business_id: BusinessId) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, business_id, entry_type, amount_cents,
                   description, image_url, created_by_id, created_at
            FROM ledger_entries
            WHERE business_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(business_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list business ledger entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    // ========================
    // Payment operations
    // ========================

    pub async fn save_payment(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (id, customer_id, business_id, amount_cents, method, reference, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.id.to_string())
        .bind(payment.customer_id.to_string())
        .bind(payment.business_id.to_string())
        .bind(payment.amount_cents)
        .bind(payment.method.as_str())
        .bind(&payment.reference)
        .bind(payment.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save payment")?;
        Ok(())
    }

    pub async fn list_payments_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, business_id, amount_cents, method, reference, created_at
            FROM payments
            WHERE customer_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list payments")?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    pub async fn list_payments(&self, business_id: BusinessId) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, business_id, amount_cents, method, reference, created_at
            FROM payments
            WHERE business_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(business_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list business payments")?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    // ========================
    // Row mapping
    // ========================

    fn row_to_business(row: &sqlx::sqlite::SqliteRow) -> Result<Business> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("owner_id");
        let created_at_str: String = row.get("created_at");

        Ok(Business {
            id: Uuid::parse_str(&id_str).context("Invalid business ID")?,
            name: row.get("name"),
            owner_id: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            created_at: Self::parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer> {
        let id_str: String = row.get("id");
        let business_str: String = row.get("business_id");
        let created_at_str: String = row.get("created_at");

        Ok(Customer {
            id: Uuid::parse_str(&id_str).context("Invalid customer ID")?,
            name: row.get("name"),
            email: row.get("email"),
            phone_number: row.get("phone_number"),
            business_id: Uuid::parse_str(&business_str).context("Invalid business ID")?,
            relationship_type: row.get("relationship_type"),
            notes: row.get("notes"),
            created_at: Self::parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<LedgerEntry> {
        let id_str: String = row.get("id");
        let customer_str: String = row.get("customer_id");
        let business_str: String = row.get("business_id");
        let entry_type_str: String = row.get("entry_type");
        let created_by_str: String = row.get("created_by_id");
        let created_at_str: String = row.get("created_at");

        Ok(LedgerEntry {
            id: Uuid::parse_str(&id_str).context("Invalid entry ID")?,
            customer_id: Uuid::parse_str(&customer_str).context("Invalid customer ID")?,
            business_id: Uuid::parse_str(&business_str).context("Invalid business ID")?,
            entry_type: EntryType::from_str(&entry_type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry type: {}", entry_type_str))?,
            amount_cents: row.get("amount_cents"),
            description: row.get("description"),
            image_url: row.get("image_url"),
            created_by_id: Uuid::parse_str(&created_by_str).context("Invalid creator ID")?,
            created_at: Self::parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_payment(row: &sqlx::sqlite::SqliteRow) -> Result<Payment> {
        let id_str: String = row.get("id");
        let customer_str: String = row.get("customer_id");
        let business_str: String = row.get("business_id");
        let method_str: String = row.get("method");
        let created_at_str: String = row.get("created_at");

        Ok(Payment {
            id: Uuid::parse_str(&id_str).context("Invalid payment ID")?,
            customer_id: Uuid::parse_str(&customer_str).context("Invalid customer ID")?,
            business_id: Uuid::parse_str(&business_str).context("Invalid business ID")?,
            amount_cents: row.get("amount_cents"),
            method: PaymentMethod::from_str(&method_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment method: {}", method_str))?,
            reference: row.get("reference"),
            created_at: Self::parse_timestamp(&created_at_str)?,
        })
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(s)
            .context("Invalid timestamp")?
            .with_timezone(&Utc))
    }
}
