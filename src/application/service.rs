use chrono::{DateTime, Utc};

use crate::domain::{
    aggregate, build_reminder_plan, compute_balance, parse_claims, reconcile, AnalyticsSummary,
    Business, Cents, Customer, CustomerBalance, DispatchReport, EntryType, LedgerEntry,
    OutstandingClaim, Payment, PaymentMethod, Reconciliation, ReminderPlan, TopCustomer,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations over the ledger store.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every computation here is stateless: balances, analytics, and
/// reconciliations are recomputed from a fresh fetch on each call, because the
/// store owns all mutation.
pub struct LedgerService {
    repo: Repository,
    business: Business,
}

/// One independently loaded slice of the analytics dashboard. A failed fetch
/// degrades its own section instead of taking the whole view down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    Loaded(T),
    Unavailable(String),
}

impl<T> Section<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            Section::Unavailable(_) => None,
        }
    }

    fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Section::Loaded(value),
            Err(err) => Section::Unavailable(err.to_string()),
        }
    }
}

/// The analytics dashboard, assembled from sections fetched in parallel.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub payables: Section<Cents>,
    pub receivables: Section<Cents>,
    pub top_customers: Section<Vec<TopCustomer>>,
}

impl Dashboard {
    /// payables - receivables, when both sections loaded.
    pub fn net_balance(&self) -> Option<Cents> {
        Some(self.payables.loaded()? - self.receivables.loaded()?)
    }
}

impl LedgerService {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str, business_name: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let business = Business::new(business_name.to_string());
        repo.save_business(&business).await?;
        Ok(Self { repo, business })
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        let business = repo
            .get_business()
            .await?
            .ok_or_else(|| AppError::Database(anyhow::anyhow!("Database not initialized")))?;
        Ok(Self { repo, business })
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    // ========================
    // Customer operations
    // ========================

    /// Register a new customer for this business.
    pub async fn create_customer(
        &self,
        name: String,
        email: Option<String>,
        phone_number: Option<String>,
        relationship_type: Option<String>,
        notes: Option<String>,
    ) -> Result<Customer, AppError> {
        if self.repo.get_customer_by_name(self.business.id, &name).await?.is_some() {
            return Err(AppError::CustomerAlreadyExists(name));
        }

        let mut customer = Customer::new(name, self.business.id);
        if let Some(email) = email {
            customer = customer.with_email(email);
        }
        if let Some(phone) = phone_number {
            customer = customer.with_phone_number(phone);
        }
        if let Some(relationship) = relationship_type {
            customer = customer.with_relationship_type(relationship);
        }
        if let Some(notes) = notes {
            customer = customer.with_notes(notes);
        }

        self.repo.save_customer(&customer).await?;
        Ok(customer)
    }

    /// List this business's customers, ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.repo.list_customers(self.business.id).await?)
    }

    /// Look a customer up by exact name.
    pub async fn get_customer(&self, name: &str) -> Result<Customer, AppError> {
        self.repo
            .get_customer_by_name(self.business.id, name)
            .await?
            .ok_or_else(|| AppError::CustomerNotFound(name.to_string()))
    }

    // ========================
    // Ledger operations
    // ========================

    /// Record a credit or debit entry against a customer's ledger.
    pub async fn record_entry(
        &self,
        customer_name: &str,
        entry_type: EntryType,
        amount_cents: Cents,
        description: Option<String>,
        image_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<LedgerEntry, AppError> {
        let customer = self.get_customer(customer_name).await?;

        let mut entry = LedgerEntry::new(
            customer.id,
            self.business.id,
            entry_type,
            amount_cents,
            self.business.owner_id,
            created_at,
        )
        .map_err(|e| AppError::InvalidAmount(e.to_string()))?;

        if let Some(description) = description {
            entry = entry.with_description(description);
        }
        if let Some(image_url) = image_url {
            entry = entry.with_image_url(image_url);
        }

        self.repo.save_entry(&entry).await?;
        Ok(entry)
    }

    /// Record a payment against a customer's outstanding balance.
    pub async fn record_payment(
        &self,
        customer_name: &str,
        amount_cents: Cents,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> Result<Payment, AppError> {
        let customer = self.get_customer(customer_name).await?;

        let mut payment = Payment::new(
            customer.id,
            self.business.id,
            amount_cents,
            method,
            Utc::now(),
        )
        .map_err(|e| AppError::InvalidAmount(e.to_string()))?;

        if let Some(reference) = reference {
            payment = payment.with_reference(reference);
        }

        self.repo.save_payment(&payment).await?;
        Ok(payment)
    }

    /// List a customer's ledger entries in recorded order.
    pub async fn list_entries(&self, customer_name: &str) -> Result<Vec<LedgerEntry>, AppError> {
        let customer = self.get_customer(customer_name).await?;
        Ok(self.repo.list_entries_for_customer(customer.id).await?)
    }

    // ========================
    // Balances & analytics
    // ========================

    /// Compute one customer's balance from a fresh fetch of their ledger.
    pub async fn customer_balance(&self, customer_name: &str) -> Result<CustomerBalance, AppError> {
        let customer = self.get_customer(customer_name).await?;
        self.balance_for(&customer).await
    }

    async fn balance_for(&self, customer: &Customer) -> Result<CustomerBalance, AppError> {
        let entries = self.repo.list_entries_for_customer(customer.id).await?;
        let payments = self.repo.list_payments_for_customer(customer.id).await?;
        Ok(compute_balance(customer.id, &entries, &payments)?)
    }

    /// Per-customer balances for the whole business, in customer-name order.
    pub async fn business_balances(&self) -> Result<Vec<CustomerBalance>, AppError> {
        let customers = self.repo.list_customers(self.business.id).await?;
        let mut balances = Vec::with_capacity(customers.len());
        for customer in &customers {
            balances.push(self.balance_for(customer).await?);
        }
        Ok(balances)
    }

    /// The full analytics summary over all customer balances.
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, AppError> {
        let balances = self.business_balances().await?;
        Ok(aggregate(&balances))
    }

    /// Load the dashboard sections concurrently. Each section fails on its
    /// own: three loaded sections still render when the fourth source is down.
    pub async fn load_dashboard(&self) -> Dashboard {
        let payables = async {
            let summary = self.analytics_summary().await?;
            Ok(summary.total_payable)
        };
        let receivables = async {
            let summary = self.analytics_summary().await?;
            Ok(summary.total_receivable)
        };
        let top_customers = async {
            let summary = self.analytics_summary().await?;
            Ok(summary.top_customers)
        };

        let (payables, receivables, top_customers) =
            tokio::join!(payables, receivables, top_customers);

        Dashboard {
            payables: Section::from_result(payables),
            receivables: Section::from_result(receivables),
            top_customers: Section::from_result(top_customers),
        }
    }

    // ========================
    // Reconciliation & reminders
    // ========================

    /// Reconcile already-parsed claims against freshly computed balances.
    pub async fn reconcile_with(
        &self,
        claims: &[OutstandingClaim],
    ) -> Result<Vec<Reconciliation>, AppError> {
        let directory = self.repo.list_customers(self.business.id).await?;
        let balances = self.business_balances().await?;
        Ok(reconcile(claims, &balances, &directory))
    }

    /// Parse a raw claims table and reconcile it. Malformed rows are skipped;
    /// use `io::ClaimImporter` when the skip report matters.
    pub async fn reconcile_claims(&self, raw: &str) -> Result<Vec<Reconciliation>, AppError> {
        let claims = parse_claims(raw);
        self.reconcile_with(&claims).await
    }

    /// Plan payment reminders for customers who currently owe the business.
    pub async fn reminder_plan(&self) -> Result<ReminderPlan, AppError> {
        let directory = self.repo.list_customers(self.business.id).await?;
        let balances = self.business_balances().await?;
        Ok(build_reminder_plan(&balances, &directory))
    }

    /// Decode the external dispatcher's report. Surfaced as-is: this engine
    /// does not retry failures.
    pub fn decode_dispatch_report(&self, json: &str) -> Result<DispatchReport, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::BadDispatchReport(e.to_string()))
    }

    // ========================
    // Snapshot accessors (export)
    // ========================

    pub async fn list_all_entries(&self) -> Result<Vec<LedgerEntry>, AppError> {
        Ok(self.repo.list_entries(self.business.id).await?)
    }

    pub async fn list_all_payments(&self) -> Result<Vec<Payment>, AppError> {
        Ok(self.repo.list_payments(self.business.id).await?)
    }
}
