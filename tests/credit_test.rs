mod common;

use anyhow::Result;
use common::{parse_date, test_service, StandardSetup};
use tallybook::application::{AppError, EntryUpdate};
use tallybook::domain::DateRange;

#[tokio::test]
async fn test_charge_grows_debt_without_moving_cash() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    StandardSetup::fund_checking(&service, 100000, parse_date("2024-01-01")).await?;

    service
        .record_card_charge("Visa", "Dining", 8000, parse_date("2024-01-10"), None)
        .await?;

    assert_eq!(service.account_standing("Visa").await?.amount, 8000);
    assert_eq!(service.account_standing("Checking").await?.amount, 100000);

    Ok(())
}

#[tokio::test]
async fn test_charge_requires_credit_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;

    let result = service
        .record_card_charge("Checking", "Dining", 8000, parse_date("2024-01-10"), None)
        .await;

    assert!(matches!(result, Err(AppError::NotACreditAccount(_))));
    Ok(())
}

#[tokio::test]
async fn test_payment_settles_debt_and_drains_debit() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    StandardSetup::fund_checking(&service, 100000, parse_date("2024-01-01")).await?;

    service
        .record_card_charge("Visa", "Dining", 8000, parse_date("2024-01-10"), None)
        .await?;
    service
        .record_card_payment("Checking", "Visa", 5000, parse_date("2024-01-20"), None)
        .await?;

    assert_eq!(service.account_standing("Visa").await?.amount, 3000);
    assert_eq!(service.account_standing("Checking").await?.amount, 95000);

    Ok(())
}

#[tokio::test]
async fn test_overpayment_shows_negative_debt() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    StandardSetup::fund_checking(&service, 100000, parse_date("2024-01-01")).await?;

    service
        .record_card_charge("Visa", "Dining", 8000, parse_date("2024-01-10"), None)
        .await?;
    service
        .record_card_payment("Checking", "Visa", 10000, parse_date("2024-01-20"), None)
        .await?;

    // Card is overpaid by 2000.
    assert_eq!(service.account_standing("Visa").await?.amount, -2000);

    Ok(())
}

#[tokio::test]
async fn test_payment_counts_as_expense_charge_does_not() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    StandardSetup::fund_checking(&service, 100000, parse_date("2024-01-01")).await?;

    service
        .record_card_charge("Visa", "Dining", 8000, parse_date("2024-01-10"), None)
        .await?;
    service
        .record_card_payment("Checking", "Visa", 5000, parse_date("2024-01-20"), None)
        .await?;

    let report = service.totals_report(DateRange::unbounded()).await?;
    assert_eq!(report.totals.income, 100000);
    // Only the payment is real cash out; counting the charge too would
    // double-count the spend once it is paid off.
    assert_eq!(report.totals.expenses, 5000);
    assert_eq!(report.totals.outstanding_debt, 3000);
    assert_eq!(report.totals.balance, 95000);

    Ok(())
}

#[tokio::test]
async fn test_payment_requires_debit_source_and_credit_target() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    service
        .create_account("Amex".into(), tallybook::domain::AccountKind::Credit, None)
        .await?;

    let from_credit = service
        .record_card_payment("Visa", "Amex", 5000, parse_date("2024-01-20"), None)
        .await;
    assert!(matches!(from_credit, Err(AppError::NotADebitAccount(_))));

    let to_debit = service
        .record_card_payment("Checking", "Savings", 5000, parse_date("2024-01-20"), None)
        .await;
    assert!(matches!(to_debit, Err(AppError::NotACreditAccount(_))));

    Ok(())
}

#[tokio::test]
async fn test_payment_edit_restricted_to_amount_and_date() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;
    StandardSetup::fund_checking(&service, 100000, parse_date("2024-01-01")).await?;

    let payment = service
        .record_card_payment("Checking", "Visa", 5000, parse_date("2024-01-20"), None)
        .await?;

    let reaccount = service
        .update_entry(
            payment.id,
            EntryUpdate {
                account: Some("Savings".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(reaccount, Err(AppError::RestrictedEdit { .. })));

    let updated = service
        .update_entry(
            payment.id,
            EntryUpdate {
                amount_cents: Some(4000),
                date: Some(parse_date("2024-01-21")),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.amount_cents, 4000);

    Ok(())
}

#[tokio::test]
async fn test_charge_cannot_move_to_another_account() -> Result<()> {
    let (service, _temp) = test_service().await?;
    StandardSetup::create_all(&service).await?;

    let charge = service
        .record_card_charge("Visa", "Dining", 8000, parse_date("2024-01-10"), None)
        .await?;

    let result = service
        .update_entry(
            charge.id,
            EntryUpdate {
                account: Some("Checking".into()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::RestrictedEdit { .. })));
    Ok(())
}
