// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tallybook::application::LedgerService;
use tallybook::domain::EntryType;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), "Test Shop").await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Record a debit entry dated `date_str` for `customer`.
pub async fn debit(
    service: &LedgerService,
    customer: &str,
    cents: i64,
    date_str: &str,
) -> Result<()> {
    service
        .record_entry(
            customer,
            EntryType::Debit,
            cents,
            None,
            None,
            parse_date(date_str),
        )
        .await?;
    Ok(())
}

/// Record a credit entry dated `date_str` for `customer`.
pub async fn credit(
    service: &LedgerService,
    customer: &str,
    cents: i64,
    date_str: &str,
) -> Result<()> {
    service
        .record_entry(
            customer,
            EntryType::Credit,
            cents,
            None,
            None,
            parse_date(date_str),
        )
        .await?;
    Ok(())
}
