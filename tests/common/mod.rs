// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tallybook::application::LedgerService;
use tallybook::domain::{AccountKind, Direction};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
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

/// Test fixture: standard account and category setup
pub struct StandardSetup;

impl StandardSetup {
    /// Create basic account set: Checking, Savings (debit) and Visa (credit)
    pub async fn create_accounts(service: &LedgerService) -> Result<()> {
        service
            .create_account("Checking".into(), AccountKind::Debit, None)
            .await?;
        service
            .create_account("Savings".into(), AccountKind::Debit, None)
            .await?;
        service
            .create_account("Visa".into(), AccountKind::Credit, None)
            .await?;
        Ok(())
    }

    /// Create common categories for both directions
    pub async fn create_categories(service: &LedgerService) -> Result<()> {
        service
            .create_category("Salary".into(), Direction::Income)
            .await?;
        service
            .create_category("Groceries".into(), Direction::Expense)
            .await?;
        service
            .create_category("Dining".into(), Direction::Expense)
            .await?;
        service
            .create_category("Rent".into(), Direction::Expense)
            .await?;
        Ok(())
    }

    /// Accounts plus categories in one call
    pub async fn create_all(service: &LedgerService) -> Result<()> {
        Self::create_accounts(service).await?;
        Self::create_categories(service).await?;
        Ok(())
    }

    /// Record a salary payment into Checking
    pub async fn fund_checking(
        service: &LedgerService,
        amount: i64,
        date: DateTime<Utc>,
    ) -> Result<()> {
        service
            .record_entry(Direction::Income, "Checking", "Salary", amount, date, None)
            .await?;
        Ok(())
    }

    /// Fund Checking with the current timestamp
    pub async fn fund_checking_now(service: &LedgerService, amount: i64) -> Result<()> {
        Self::fund_checking(service, amount, Utc::now()).await
    }
}
