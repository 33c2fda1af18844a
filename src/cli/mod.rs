use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{
    EntryUpdate, LedgerService, TemplateSummarizer, TransactionFilter,
};
use crate::domain::{format_cents, parse_cents, AccountKind, DateRange, Direction};

/// Tallybook - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "A local-first personal finance tracker for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tallybook.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Record an income or expense entry
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Direction: income or expense
        #[arg(short = 'D', long)]
        direction: String,

        /// Account name
        #[arg(short, long)]
        account: String,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Description of the entry
        #[arg(long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Move money between two of your own accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Source account name
        #[arg(long)]
        from: String,

        /// Destination account name
        #[arg(long)]
        to: String,

        /// Description of the transfer
        #[arg(long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a credit-card charge (grows debt, no cash moves)
    Charge {
        /// Amount charged (e.g., "50.00" or "50")
        amount: String,

        /// Credit account name
        #[arg(long)]
        card: String,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Description of the charge
        #[arg(long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Pay down a credit account from a debit account
    Pay {
        /// Amount to pay (e.g., "50.00" or "50")
        amount: String,

        /// Debit account the money leaves
        #[arg(long)]
        from: String,

        /// Credit account being paid down
        #[arg(long)]
        card: String,

        /// Description of the payment
        #[arg(long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an existing entry
    Edit {
        /// Transaction ID
        id: String,

        /// New amount
        #[arg(long)]
        amount: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,

        /// New category name
        #[arg(long)]
        category: Option<String>,

        /// New account name
        #[arg(long)]
        account: Option<String>,
    },

    /// Delete an entry (both legs, if it is a transfer)
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show standing for one account or all accounts
    Balance {
        /// Account name (omit for all accounts)
        account: Option<String>,
    },

    /// List transactions
    Transactions {
        /// Filter by account name
        #[arg(long)]
        account: Option<String>,

        /// Filter by category name
        #[arg(long)]
        category: Option<String>,

        /// Filter by direction: income or expense
        #[arg(long)]
        direction: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,

        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Generate reports and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Natural-language spending summary for a period
    Summary {
        /// Start date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        to: Option<String>,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, standings, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import entries from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Create categories that don't exist
        #[arg(long)]
        create_categories: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Add {
        /// Account name (must be unique)
        name: String,

        /// Account kind: debit, credit
        #[arg(short = 'k', long = "kind")]
        kind: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all accounts with their standings
    List {
        /// Include archived accounts
        #[arg(long)]
        all: bool,
    },

    /// Archive an account (soft delete; history keeps counting)
    Archive {
        /// Account name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Add {
        /// Category name
        name: String,

        /// Direction: income or expense
        #[arg(short = 'D', long)]
        direction: String,
    },

    /// List categories
    List {
        /// Filter by direction: income or expense
        #[arg(long)]
        direction: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expenses, outstanding debt and balance for a period
    Totals {
        /// Start date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Category breakdown for one direction
    Categories {
        /// Direction: income or expense
        #[arg(short = 'D', long, default_value = "expense")]
        direction: String,

        /// Start date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, omit for all time)
        #[arg(long)]
        to: Option<String>,

        /// Fold card payments into one "Credit Card Payment" row
        #[arg(long)]
        fold_payments: bool,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Month-by-month income, expenses and new card charges
    Monthly {
        /// Number of months to include
        #[arg(short, long, default_value = "12")]
        months: usize,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Account(account_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_account_command(&service, account_cmd).await?;
            }

            Commands::Category(category_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_category_command(&service, category_cmd).await?;
            }

            Commands::Add {
                amount,
                direction,
                account,
                category,
                description,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let direction = parse_direction(&direction)?;
                let amount_cents = parse_amount(&amount)?;
                let date = parse_date_or_now(date.as_deref())?;

                let tx = service
                    .record_entry(direction, &account, &category, amount_cents, date, description)
                    .await?;

                println!(
                    "Recorded {}: {} on {} ({})",
                    direction,
                    format_cents(tx.amount_cents),
                    account,
                    tx.id
                );
            }

            Commands::Transfer {
                amount,
                from,
                to,
                description,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;
                let date = parse_date_or_now(date.as_deref())?;

                let result = service
                    .record_transfer(&from, &to, amount_cents, date, description)
                    .await?;

                println!(
                    "Recorded transfer: {} {} -> {} ({})",
                    format_cents(result.out_leg.amount_cents),
                    result.from_account_name,
                    result.to_account_name,
                    result.out_leg.id
                );
            }

            Commands::Charge {
                amount,
                card,
                category,
                description,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;
                let date = parse_date_or_now(date.as_deref())?;

                let tx = service
                    .record_card_charge(&card, &category, amount_cents, date, description)
                    .await?;

                println!(
                    "Recorded charge: {} on {} ({})",
                    format_cents(tx.amount_cents),
                    card,
                    tx.id
                );
            }

            Commands::Pay {
                amount,
                from,
                card,
                description,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;
                let date = parse_date_or_now(date.as_deref())?;

                let tx = service
                    .record_card_payment(&from, &card, amount_cents, date, description)
                    .await?;

                println!(
                    "Recorded payment: {} from {} toward {} ({})",
                    format_cents(tx.amount_cents),
                    from,
                    card,
                    tx.id
                );
            }

            Commands::Edit {
                id,
                amount,
                date,
                description,
                category,
                account,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let id = Uuid::parse_str(&id)
                    .context("Invalid transaction ID format (expected UUID)")?;

                let update = EntryUpdate {
                    amount_cents: amount.as_deref().map(parse_amount).transpose()?,
                    date: date.as_deref().map(parse_date).transpose()?,
                    description,
                    category,
                    account,
                };

                let tx = service.update_entry(id, update).await?;
                println!("Updated entry {}", tx.id);
            }

            Commands::Delete { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let id = Uuid::parse_str(&id)
                    .context("Invalid transaction ID format (expected UUID)")?;

                let tx = service.delete_entry(id).await?;
                if tx.is_transfer_leg() {
                    println!("Deleted transfer pair {}", tx.transfer_link.unwrap_or_default());
                } else {
                    println!("Deleted entry {}", tx.id);
                }
            }

            Commands::Balance { account } => {
                let service = LedgerService::connect(&self.database).await?;
                run_balance_command(&service, account).await?;
            }

            Commands::Transactions {
                account,
                category,
                direction,
                from_date,
                to_date,
                limit,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let filter = TransactionFilter {
                    account,
                    category,
                    direction: direction.as_deref().map(parse_direction).transpose()?,
                    from_date: from_date.as_deref().map(parse_date).transpose()?,
                    to_date: to_date.as_deref().map(parse_date).transpose()?,
                    limit,
                };
                run_transactions_command(&service, filter).await?;
            }

            Commands::Report(report_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Summary { from, to } => {
                let service = LedgerService::connect(&self.database).await?;
                let range = parse_range(from.as_deref(), to.as_deref())?;
                let text = service.summarize(range, &TemplateSummarizer).await?;
                println!("{}", text);
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Import {
                input,
                dry_run,
                create_categories,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_import_command(&service, input.as_deref(), dry_run, create_categories).await?;
            }
        }

        Ok(())
    }
}

async fn run_account_command(service: &LedgerService, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Add {
            name,
            kind,
            description,
        } => {
            let kind = AccountKind::from_str(&kind).ok_or_else(|| {
                anyhow::anyhow!("Invalid account kind '{}'. Valid kinds: debit, credit", kind)
            })?;

            let account = service.create_account(name, kind, description).await?;
            println!("Created account: {} ({})", account.name, account.kind);
        }

        AccountCommands::List { all } => {
            let accounts = service.list_accounts(all).await?;
            if accounts.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            let standings: HashMap<_, _> = service
                .all_standings()
                .await?
                .into_iter()
                .map(|s| (s.account_id, s.amount))
                .collect();

            println!("{:<20} {:<8} {:>14}", "NAME", "KIND", "STANDING");
            println!("{}", "-".repeat(44));
            for account in accounts {
                let amount = standings.get(&account.id).copied().unwrap_or(0);
                let label = match account.kind {
                    AccountKind::Debit => format_cents(amount),
                    AccountKind::Credit => format!("{} owed", format_cents(amount)),
                };
                println!("{:<20} {:<8} {:>14}", truncate(&account.name, 20), account.kind, label);
            }
        }

        AccountCommands::Archive { name } => {
            service.archive_account(&name).await?;
            println!("Archived account: {}", name);
        }
    }
    Ok(())
}

async fn run_category_command(service: &LedgerService, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Add { name, direction } => {
            let direction = parse_direction(&direction)?;
            let category = service.create_category(name, direction).await?;
            println!("Created category: {} ({})", category.name, category.direction);
        }

        CategoryCommands::List { direction } => {
            let direction = direction.as_deref().map(parse_direction).transpose()?;
            let categories = service.list_categories(direction).await?;
            if categories.is_empty() {
                println!("No categories found.");
                return Ok(());
            }

            println!("{:<28} {:<8}", "NAME", "DIRECTION");
            println!("{}", "-".repeat(37));
            for category in categories {
                println!("{:<28} {:<8}", truncate(&category.name, 28), category.direction);
            }
        }
    }
    Ok(())
}

async fn run_balance_command(service: &LedgerService, account: Option<String>) -> Result<()> {
    match account {
        Some(name) => {
            let standing = service.account_standing(&name).await?;
            match standing.kind {
                AccountKind::Debit => {
                    println!("{}: {}", standing.name, format_cents(standing.amount))
                }
                AccountKind::Credit => {
                    println!("{}: {} owed", standing.name, format_cents(standing.amount))
                }
            }
        }
        None => {
            let report = service.overview().await?;
            if report.standings.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            println!("{:<20} {:>14}", "ACCOUNT", "STANDING");
            println!("{}", "-".repeat(35));
            for standing in &report.standings {
                let label = match standing.kind {
                    AccountKind::Debit => format_cents(standing.amount),
                    AccountKind::Credit => format!("{} owed", format_cents(standing.amount)),
                };
                println!("{:<20} {:>14}", truncate(&standing.name, 20), label);
            }

            println!("{}", "-".repeat(35));
            println!("{:<20} {:>14}", "Income", format_cents(report.totals.income));
            println!("{:<20} {:>14}", "Expenses", format_cents(report.totals.expenses));
            println!(
                "{:<20} {:>14}",
                "Outstanding debt",
                format_cents(report.totals.outstanding_debt)
            );
            println!("{:<20} {:>14}", "Balance", format_cents(report.totals.balance));
        }
    }
    Ok(())
}

async fn run_transactions_command(
    service: &LedgerService,
    filter: TransactionFilter,
) -> Result<()> {
    let transactions = service.list_transactions(filter).await?;
    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let account_names: HashMap<_, _> = service
        .list_accounts(true)
        .await?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let category_names: HashMap<_, _> = service
        .list_categories(None)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    println!(
        "{:<12} {:<8} {:<16} {:<18} {:>12}  {}",
        "DATE", "TYPE", "ACCOUNT", "CATEGORY", "AMOUNT", "NOTE"
    );
    println!("{}", "-".repeat(90));

    for tx in &transactions {
        let kind = if tx.is_transfer_leg() {
            "xfer"
        } else if tx.is_card_charge {
            "charge"
        } else if tx.is_card_payment() {
            "payment"
        } else {
            tx.direction.as_str()
        };

        let account = account_names
            .get(&tx.account_id)
            .cloned()
            .unwrap_or_else(|| tx.account_id.to_string());
        let category = category_names
            .get(&tx.category_id)
            .cloned()
            .unwrap_or_else(|| tx.category_id.to_string());

        println!(
            "{:<12} {:<8} {:<16} {:<18} {:>12}  {}",
            tx.date.format("%Y-%m-%d"),
            kind,
            truncate(&account, 16),
            truncate(&category, 18),
            format_cents(tx.signed_amount()),
            tx.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

async fn run_report_command(service: &LedgerService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Totals { from, to, format } => {
            let range = parse_range(from.as_deref(), to.as_deref())?;
            let report = service.totals_report(range).await?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => {
                    println!("Totals Report");
                    print_range(&range);
                    println!();
                    println!("Income:           {:>14}", format_cents(report.totals.income));
                    println!("Expenses:         {:>14}", format_cents(report.totals.expenses));
                    println!(
                        "Outstanding debt: {:>14}",
                        format_cents(report.totals.outstanding_debt)
                    );
                    println!("{}", "-".repeat(32));
                    println!("Balance:          {:>14}", format_cents(report.totals.balance));
                }
            }
        }

        ReportCommands::Categories {
            direction,
            from,
            to,
            fold_payments,
            format,
        } => {
            let direction = parse_direction(&direction)?;
            let range = parse_range(from.as_deref(), to.as_deref())?;
            let report = service.category_report(direction, range, fold_payments).await?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("category,total_cents");
                    for row in &report.rows {
                        println!("{},{}", row.label, row.total);
                    }
                }
                _ => {
                    println!("Category Breakdown ({})", direction);
                    print_range(&range);
                    println!();
                    println!("{:<24} {:>12} {:>8}", "CATEGORY", "TOTAL", "SHARE");
                    println!("{}", "-".repeat(46));
                    for row in &report.rows {
                        let share = if report.total > 0 {
                            row.total as f64 / report.total as f64 * 100.0
                        } else {
                            0.0
                        };
                        println!(
                            "{:<24} {:>12} {:>7.1}%",
                            truncate(&row.label, 24),
                            format_cents(row.total),
                            share
                        );
                    }
                    println!("{}", "-".repeat(46));
                    println!("{:<24} {:>12}", "TOTAL", format_cents(report.total));
                }
            }
        }

        ReportCommands::Monthly { months, format } => {
            let report = service.monthly_report(months).await?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("month,income_cents,expense_cents,new_charges_cents");
                    for month in &report.months {
                        println!(
                            "{},{},{},{}",
                            month.label(),
                            month.income,
                            month.expenses,
                            month.new_charges
                        );
                    }
                }
                _ => {
                    println!("Monthly Report");
                    println!();
                    println!(
                        "{:<10} {:>12} {:>12} {:>14}",
                        "MONTH", "INCOME", "EXPENSES", "NEW CHARGES"
                    );
                    println!("{}", "-".repeat(52));
                    for month in &report.months {
                        println!(
                            "{:<10} {:>12} {:>12} {:>14}",
                            month.label(),
                            format_cents(month.income),
                            format_cents(month.expenses),
                            format_cents(month.new_charges)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "standings" => {
            let count = exporter.export_standings_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} account standings", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} accounts, {} categories, {} transactions",
                    snapshot.accounts.len(),
                    snapshot.categories.len(),
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, standings, full",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    input: Option<&str>,
    dry_run: bool,
    create_categories: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions {
        dry_run,
        create_missing_categories: create_categories,
    };

    let result = importer.import_entries_csv(reader, options).await?;

    if dry_run {
        println!("Validation successful");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn parse_direction(s: &str) -> Result<Direction> {
    Direction::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid direction '{}'. Valid: income, expense", s))
}

fn parse_amount(s: &str) -> Result<i64> {
    parse_cents(s).context("Invalid amount format. Use '50.00' or '50'")
}

fn parse_date_or_now(date: Option<&str>) -> Result<DateTime<Utc>> {
    match date {
        Some(date_str) => parse_date(date_str),
        None => Ok(Utc::now()),
    }
}

fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    Ok(DateRange::new(
        from.map(parse_date).transpose()?,
        to.map(parse_date).transpose()?,
    ))
}

fn print_range(range: &DateRange) {
    match (range.from, range.to) {
        (None, None) => println!("Period: all time"),
        (from, to) => println!(
            "Period: {} to {}",
            from.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "start".to_string()),
            to.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "now".to_string()),
        ),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    use chrono::NaiveDate;

    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")?;

    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(DateTime::from_naive_utc_and_offset(naive_datetime, Utc))
}
