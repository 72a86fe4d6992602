use serde::{Deserialize, Serialize};

use super::{format_cents, Cents, Customer, CustomerBalance, CustomerId};

/// The set of customers a payment reminder should go to.
/// Pure function of its inputs: same balances in, byte-identical plan out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPlan {
    pub to_notify: Vec<CustomerId>,
}

/// Plan reminders for every known customer who currently owes the business.
///
/// Only positive outstanding balances qualify; settled customers and customers
/// the business owes are left alone. Customers missing from the directory are
/// excluded: there is nobody to address the reminder to. The actual delivery
/// belongs to an external dispatcher.
pub fn build_reminder_plan(balances: &[CustomerBalance], directory: &[Customer]) -> ReminderPlan {
    let mut to_notify: Vec<CustomerId> = balances
        .iter()
        .filter(|b| b.net_outstanding > 0)
        .filter(|b| directory.iter().any(|c| c.id == b.customer_id))
        .map(|b| b.customer_id)
        .collect();
    to_notify.sort();
    to_notify.dedup();

    ReminderPlan { to_notify }
}

/// Message body handed to the dispatcher alongside the plan.
pub fn reminder_body(customer_name: &str, outstanding_cents: Cents) -> String {
    format!(
        "Dear {},\n\n\
         Our records show you have an outstanding balance of ${}.\n\
         Please make a payment at your earliest convenience.\n\n\
         Thank you.",
        customer_name,
        format_cents(outstanding_cents)
    )
}

/// What the external dispatcher reports back after attempting delivery.
/// Passed through for display exactly as received; retries are the
/// dispatcher's business, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchReport {
    pub sent: Vec<String>,
    pub failed: Vec<DispatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub customer: String,
    pub reason: String,
}
