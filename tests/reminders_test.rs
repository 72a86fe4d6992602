mod common;

use anyhow::Result;
use common::{credit, debit, test_service};
use tallybook::domain::PaymentMethod;

#[tokio::test]
async fn test_plan_only_includes_customers_who_owe() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Owes 50.00
    service
        .create_customer("Owes".to_string(), Some("owes@example.com".to_string()), None, None, None)
        .await?;
    debit(&service, "Owes", 5000, "2024-01-01").await?;

    // Fully paid up
    service
        .create_customer("Settled".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Settled", 2000, "2024-01-01").await?;
    service
        .record_payment("Settled", 2000, PaymentMethod::Cash, None)
        .await?;

    // The business owes them
    service
        .create_customer("In Credit".to_string(), None, None, None, None)
        .await?;
    credit(&service, "In Credit", 900, "2024-01-01").await?;

    let plan = service.reminder_plan().await?;
    let owes = service.get_customer("Owes").await?;
    assert_eq!(plan.to_notify, vec![owes.id]);

    Ok(())
}

#[tokio::test]
async fn test_plan_is_idempotent_on_unchanged_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for name in ["A", "B", "C"] {
        service
            .create_customer(name.to_string(), None, None, None, None)
            .await?;
        debit(&service, name, 1000, "2024-01-01").await?;
    }

    let first = service.reminder_plan().await?;
    let second = service.reminder_plan().await?;
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first)?,
        serde_json::to_vec(&second)?
    );
    assert_eq!(first.to_notify.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_dispatch_report_passes_through() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let json = r#"{
        "sent": ["owes@example.com"],
        "failed": [{"customer": "Beta", "reason": "No email address"}]
    }"#;
    let report = service.decode_dispatch_report(json)?;

    assert_eq!(report.sent, vec!["owes@example.com"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].customer, "Beta");
    assert_eq!(report.failed[0].reason, "No email address");

    Ok(())
}
