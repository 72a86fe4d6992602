mod common;

use anyhow::Result;
use common::{credit, debit, test_service};
use tallybook::domain::Reconciliation;
use tallybook::io::{ClaimImporter, Exporter};

#[tokio::test]
async fn test_reconcile_spreadsheet_export_end_to_end() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 150050, "2024-01-01").await?;
    credit(&service, "Acme Co", 30000, "2024-01-10").await?;

    service
        .create_customer("Beta".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Beta", 30000, "2024-01-05").await?;

    // Hand-edited spreadsheet export: header, quoted dollar amount with
    // thousands separator, a short row, an empty name, and a plain row
    let raw = "Name,Amount\nAcme Co,\"$1,200.50\"\nBad Row\n,abc\nBeta,300";
    let results = service.reconcile_claims(raw).await?;

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0],
        Reconciliation::Matched {
            customer_id: service.get_customer("Acme Co").await?.id,
            customer_name: "Acme Co".to_string(),
            computed_cents: 120050,
            claimed_cents: 120050,
            delta_cents: 0,
        }
    );
    assert!(results[0].is_reconciled());
    assert!(results[1].is_reconciled());

    Ok(())
}

#[tokio::test]
async fn test_reconcile_is_case_insensitive_on_names() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 5000, "2024-01-01").await?;

    let results = service.reconcile_claims("ACME CO,50.00").await?;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_reconciled());

    Ok(())
}

#[tokio::test]
async fn test_ghost_claim_and_silent_customer_both_surface() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 5000, "2024-01-01").await?;

    let results = service.reconcile_claims("Ghost Co,50").await?;

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0],
        Reconciliation::UnmatchedClaim {
            customer_name: "Ghost Co".to_string(),
            claimed_cents: 5000,
        }
    );
    let acme = service.get_customer("Acme Co").await?;
    assert_eq!(
        results[1],
        Reconciliation::UnmatchedBalance {
            customer_id: acme.id,
            customer_name: "Acme Co".to_string(),
            computed_cents: 5000,
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_discrepancy_carries_signed_delta() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 10000, "2024-01-01").await?;

    // Auditor claims less than we computed
    let results = service.reconcile_claims("Acme Co,80.00").await?;
    match &results[0] {
        Reconciliation::Matched { delta_cents, .. } => assert_eq!(*delta_cents, -2000),
        other => panic!("expected a matched result, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_reconciliation_report_csv_covers_every_status() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Reconciled, discrepant, and silent customers, plus a ghost claim
    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 5000, "2024-01-01").await?;
    service
        .create_customer("Beta".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Beta", 1000, "2024-01-02").await?;
    service
        .create_customer("Silent".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Silent", 700, "2024-01-03").await?;

    let results = service
        .reconcile_claims("Acme Co,50.00\nBeta,20.00\nGhost Co,10")
        .await?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&service).export_reconciliation_csv(&results, &mut buffer)?;
    assert_eq!(count, results.len());

    let report = String::from_utf8(buffer)?;
    let statuses: Vec<&str> = report
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec![
            "reconciled",
            "discrepancy",
            "unmatched_claim",
            "unmatched_balance"
        ]
    );
    assert!(report.contains("discrepancy,Beta,10.00,20.00,10.00"));
    assert!(report.contains("unmatched_claim,Ghost Co,,10.00,"));
    assert!(report.contains("unmatched_balance,Silent,7.00,,"));

    Ok(())
}

#[tokio::test]
async fn test_importer_reports_what_reconcile_skips() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .create_customer("Acme Co".to_string(), None, None, None, None)
        .await?;
    debit(&service, "Acme Co", 120050, "2024-01-01").await?;

    let raw = "Name,Amount\nAcme Co,\"$1,200.50\"\nBad Row\n,abc\n";
    let import = ClaimImporter::import_str(raw);
    assert_eq!(import.imported, 1);
    assert_eq!(import.skipped, 2);

    // The skipped rows never reach reconciliation, and the good row matches
    let results = service.reconcile_with(&import.claims).await?;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_reconciled());

    Ok(())
}
