use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{LedgerService, TransactionFilter};
use crate::domain::{Account, Category, Transaction};

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting tracker data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format, ids resolved to names.
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self
            .service
            .list_transactions(TransactionFilter::default())
            .await?;
        let account_names: HashMap<_, _> = self
            .service
            .list_accounts(true)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        let category_names: HashMap<_, _> = self
            .service
            .list_categories(None)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "id",
            "date",
            "direction",
            "account",
            "category",
            "amount_cents",
            "description",
            "transfer_link",
            "is_card_charge",
            "payment_for",
        ])?;

        let mut count = 0;
        for tx in &transactions {
            let resolve_account = |id| {
                account_names
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| id.to_string())
            };

            csv_writer.write_record([
                tx.id.to_string(),
                tx.date.to_rfc3339(),
                tx.direction.to_string(),
                resolve_account(tx.account_id),
                category_names
                    .get(&tx.category_id)
                    .cloned()
                    .unwrap_or_else(|| tx.category_id.to_string()),
                tx.amount_cents.to_string(),
                tx.description.clone().unwrap_or_default(),
                tx.transfer_link.map(|id| id.to_string()).unwrap_or_default(),
                if tx.is_card_charge { "true" } else { "false" }.to_string(),
                tx.payment_for.map(resolve_account).unwrap_or_default(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export account standings to CSV format
    pub async fn export_standings_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let standings = self.service.all_standings().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account", "kind", "amount_cents"])?;

        let mut count = 0;
        for standing in &standings {
            csv_writer.write_record([
                standing.name.clone(),
                standing.kind.to_string(),
                standing.amount.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export full database as JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let accounts = self.service.list_accounts(true).await?;
        let categories = self.service.list_categories(None).await?;
        let transactions = self
            .service
            .list_transactions(TransactionFilter::default())
            .await?;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts,
            categories,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
