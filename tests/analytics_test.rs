mod common;

use anyhow::Result;
use common::{credit, debit, test_service};
use tallybook::application::Section;
use tallybook::domain::PaymentMethod;

#[tokio::test]
async fn test_empty_business_summary_is_all_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let summary = service.analytics_summary().await?;
    assert_eq!(summary.total_payable, 0);
    assert_eq!(summary.total_receivable, 0);
    assert_eq!(summary.net_balance, 0);
    assert!(summary.top_customers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_payables_and_receivables_split() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Acme owes the business 100.00
    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 10000, "2024-01-01").await?;

    // The business owes Beta 30.00
    service
        .create_customer("Beta".to_string(), None, None, None, None)
        .await?;
    credit(&service, "Beta", 3000, "2024-01-02").await?;

    // Gamma is settled after a payment
    service
        .create_customer("Gamma".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Gamma", 4500, "2024-01-03").await?;
    service
        .record_payment("Gamma", 4500, PaymentMethod::BankTransfer, None)
        .await?;

    let summary = service.analytics_summary().await?;
    assert_eq!(summary.total_payable, 10000);
    assert_eq!(summary.total_receivable, 3000);
    assert_eq!(summary.net_balance, 7000);
    assert_eq!(
        summary.net_balance,
        summary.total_payable - summary.total_receivable
    );

    Ok(())
}

#[tokio::test]
async fn test_top_customers_need_repeat_activity() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // One big one-off entry: not ranked
    service
        .create_customer("One Off".to_string(), None, None, None, None)
        .await?;
    debit(&service, "One Off", 9_000_00, "2024-01-01").await?;

    // Two small entries: ranked
    service
        .create_customer("Regular".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Regular", 100, "2024-01-01").await?;
    debit(&service, "Regular", 100, "2024-01-02").await?;

    let summary = service.analytics_summary().await?;
    assert_eq!(summary.top_customers.len(), 1);

    let regular = service.get_customer("Regular").await?;
    assert_eq!(summary.top_customers[0].customer_id, regular.id);
    assert_eq!(summary.top_customers[0].entry_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_ranking_prefers_entry_count_then_magnitude() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Busy".to_string(), None, None, None, None)
        .await?;
    for day in 1..=4 {
        debit(&service, "Busy", 100, &format!("2024-01-{:02}", day)).await?;
    }

    // Same magnitude but fewer entries than Busy
    service
        .create_customer("Big".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Big", 50000, "2024-01-01").await?;
    debit(&service, "Big", 50000, "2024-01-02").await?;

    let summary = service.analytics_summary().await?;
    let busy = service.get_customer("Busy").await?;
    let big = service.get_customer("Big").await?;

    assert_eq!(summary.top_customers[0].customer_id, busy.id);
    assert_eq!(summary.top_customers[1].customer_id, big.id);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_sections_load_together() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 10000, "2024-01-01").await?;
    debit(&service, "Acme Co", 2000, "2024-01-02").await?;

    let dashboard = service.load_dashboard().await;

    assert_eq!(dashboard.payables, Section::Loaded(12000));
    assert_eq!(dashboard.receivables, Section::Loaded(0));
    assert_eq!(dashboard.net_balance(), Some(12000));
    let top = dashboard.top_customers.loaded().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].entry_count, 2);

    Ok(())
}
