use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{format_cents, Customer, LedgerEntry, Payment, Reconciliation};

/// Full database snapshot for export/backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub business_name: String,
    pub customers: Vec<Customer>,
    pub entries: Vec<LedgerEntry>,
    pub payments: Vec<Payment>,
}

/// Exporter for converting ledger data to tabular and snapshot formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export per-customer outstanding balances to CSV.
    pub async fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let customers = self.service.list_customers().await?;
        let balances = self.service.business_balances().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "customer_name",
            "total_credits",
            "total_debits",
            "total_payments",
            "net_outstanding",
            "entry_count",
        ])?;

        let mut count = 0;
        for (customer, balance) in customers.iter().zip(&balances) {
            csv_writer.write_record([
                customer.name.clone(),
                format_cents(balance.total_credits),
                format_cents(balance.total_debits),
                format_cents(balance.total_payments),
                format_cents(balance.net_outstanding),
                balance.entry_count.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a reconciliation run to CSV for review.
    pub fn export_reconciliation_csv<W: Write>(
        &self,
        results: &[Reconciliation],
        writer: W,
    ) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["status", "customer_name", "computed", "claimed", "delta"])?;

        for result in results {
            let record = match result {
                Reconciliation::Matched {
                    customer_name,
                    computed_cents,
                    claimed_cents,
                    delta_cents,
                    ..
                } => {
                    let status = if *delta_cents == 0 {
                        "reconciled"
                    } else {
                        "discrepancy"
                    };
                    [
                        status.to_string(),
                        customer_name.clone(),
                        format_cents(*computed_cents),
                        format_cents(*claimed_cents),
                        format_cents(*delta_cents),
                    ]
                }
                Reconciliation::UnmatchedClaim {
                    customer_name,
                    claimed_cents,
                } => [
                    "unmatched_claim".to_string(),
                    customer_name.clone(),
                    String::new(),
                    format_cents(*claimed_cents),
                    String::new(),
                ],
                Reconciliation::UnmatchedBalance {
                    customer_name,
                    computed_cents,
                    ..
                } => [
                    "unmatched_balance".to_string(),
                    customer_name.clone(),
                    format_cents(*computed_cents),
                    String::new(),
                    String::new(),
                ],
            };
            csv_writer.write_record(record)?;
        }

        csv_writer.flush()?;
        Ok(results.len())
    }

    /// Export the whole ledger as a JSON snapshot.
    pub async fn export_snapshot_json<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            business_name: self.service.business().name.clone(),
            customers: self.service.list_customers().await?,
            entries: self.service.list_all_entries().await?,
            payments: self.service.list_all_payments().await?,
        };

        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(())
    }
}
