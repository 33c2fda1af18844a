use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Read;

use crate::application::LedgerService;
use crate::domain::{parse_cents, Direction};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
    pub create_missing_categories: bool,
}

/// Importer for loading plain income/expense entries into the tracker.
///
/// This is the normalization boundary: every row is parsed into the strict
/// transaction shape before it can reach the ledger, and rows that fail are
/// reported with their line number and skipped, never silently zeroed.
pub struct Importer<'a> {
    service: &'a LedgerService,
}

/// Expected CSV columns: date, direction, account, category, amount, description
impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    pub async fn import_entries_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let date_str = record.get(0).unwrap_or("");
            let direction_str = record.get(1).unwrap_or("");
            let account = record.get(2).unwrap_or("");
            let category = record.get(3).unwrap_or("");
            let amount_str = record.get(4).unwrap_or("");
            let description = record
                .get(5)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            let date = match parse_timestamp(date_str) {
                Ok(d) => d,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("date".to_string()),
                        error: format!("Invalid date: {}", e),
                    });
                    continue;
                }
            };

            let direction = match Direction::from_str(direction_str) {
                Some(d) => d,
                None => {
                    errors.push(ImportError {
                        line,
                        field: Some("direction".to_string()),
                        error: format!("Invalid direction: {}", direction_str),
                    });
                    continue;
                }
            };

            let amount_cents = match parse_cents(amount_str) {
                Ok(a) if a > 0 => a,
                Ok(a) => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Amount must be positive, got {}", a),
                    });
                    continue;
                }
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", e),
                    });
                    continue;
                }
            };

            if options.create_missing_categories {
                if let Err(e) = self.ensure_category(category, direction).await {
                    errors.push(ImportError {
                        line,
                        field: Some("category".to_string()),
                        error: format!("Category error: {}", e),
                    });
                    continue;
                }
            }

            if options.dry_run {
                imported += 1;
                continue;
            }

            match self
                .service
                .record_entry(direction, account, category, amount_cents, date, description)
                .await
            {
                Ok(_) => imported += 1,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("Entry creation failed: {}", e),
                    });
                }
            }
        }

        Ok(ImportResult { imported, errors })
    }

    async fn ensure_category(&self, name: &str, direction: Direction) -> Result<()> {
        let existing = self
            .service
            .list_categories(Some(direction))
            .await?
            .into_iter()
            .any(|c| c.name == name);
        if !existing {
            self.service
                .create_category(name.to_string(), direction)
                .await?;
        }
        Ok(())
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    anyhow::bail!("Invalid timestamp format: {}", s)
}
