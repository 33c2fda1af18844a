use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{format_cents, Account, Category, Cents, Direction, Transaction};

/// One resolved transaction as fed to a text-summarization backend: ids
/// replaced by display names, with raw-id fallback for dangling references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub direction: Direction,
    pub category: String,
    pub account: String,
    pub date: DateTime<Utc>,
    pub amount_cents: Cents,
    pub description: Option<String>,
}

/// Resolve a transaction snapshot into the flat feed a summarizer consumes.
pub fn build_feed(
    transactions: &[Transaction],
    accounts: &[Account],
    categories: &[Category],
) -> Vec<SummaryEntry> {
    let account_names: HashMap<_, _> = accounts.iter().map(|a| (a.id, a.name.as_str())).collect();
    let category_names: HashMap<_, _> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    transactions
        .iter()
        .map(|tx| SummaryEntry {
            direction: tx.direction,
            category: category_names
                .get(&tx.category_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| tx.category_id.to_string()),
            account: account_names
                .get(&tx.account_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| tx.account_id.to_string()),
            date: tx.date,
            amount_cents: tx.amount_cents,
            description: tx.description.clone(),
        })
        .collect()
}

/// Seam for the natural-language summary backend. A generative service is
/// one implementation; [`TemplateSummarizer`] is the built-in offline one.
/// Failures are recoverable and must never take the rest of the app down.
pub trait Summarizer {
    fn summarize(&self, entries: &[SummaryEntry]) -> Result<String, SummaryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct SummaryError(pub String);

/// Deterministic plain-text summary assembled locally.
#[derive(Debug, Default)]
pub struct TemplateSummarizer;

impl Summarizer for TemplateSummarizer {
    fn summarize(&self, entries: &[SummaryEntry]) -> Result<String, SummaryError> {
        if entries.is_empty() {
            return Ok("No transactions in this period.".to_string());
        }

        let mut income: Cents = 0;
        let mut spent: Cents = 0;
        let mut by_category: HashMap<&str, Cents> = HashMap::new();

        for entry in entries {
            match entry.direction {
                Direction::Income => income += entry.amount_cents,
                Direction::Expense => {
                    spent += entry.amount_cents;
                    *by_category.entry(entry.category.as_str()).or_insert(0) +=
                        entry.amount_cents;
                }
            }
        }

        let mut lines = vec![format!(
            "Recorded {} transactions: {} earned, {} spent.",
            entries.len(),
            format_cents(income),
            format_cents(spent),
        )];

        let top = by_category
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));
        if let Some((category, total)) = top {
            lines.push(format!(
                "Biggest spending category was {} at {}.",
                category,
                format_cents(*total)
            ));
        }

        if income > spent {
            lines.push(format!("You ended {} ahead.", format_cents(income - spent)));
        } else if spent > income {
            lines.push(format!("You spent {} more than you earned.", format_cents(spent - income)));
        }

        Ok(lines.join(" "))
    }
}
