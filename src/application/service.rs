use chrono::{DateTime, Utc};

use crate::domain::{
    account_balance, account_debt, category_breakdown, monthly_series, totals, Account, AccountKind,
    BreakdownOptions, Category, Cents, DateRange, Direction, Transaction, TransactionId,
    CARD_PAYMENT_CATEGORY, TRANSFER_CATEGORY,
};
use crate::storage::Repository;

use super::reporting::{
    AccountStanding, CategoryReport, MonthlyReport, OverviewReport, TotalsReport,
};
use super::summary::{build_feed, Summarizer, SummaryEntry};
use super::AppError;

/// Application service providing high-level operations for the tracker.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    repo: Repository,
}

/// Result of recording a transfer
pub struct TransferResult {
    pub out_leg: Transaction,
    pub in_leg: Transaction,
    pub from_account_name: String,
    pub to_account_name: String,
}

/// Filter for querying transactions
#[derive(Default)]
pub struct TransactionFilter {
    pub account: Option<String>,
    pub category: Option<String>,
    pub direction: Option<Direction>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Field changes for an existing entry. `None` means "leave unchanged".
#[derive(Default)]
pub struct EntryUpdate {
    pub amount_cents: Option<Cents>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub account: Option<String>,
}

impl LedgerService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path and seed the reserved
    /// categories.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let service = Self::new(repo);
        service.seed_reserved_categories().await?;
        Ok(service)
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    async fn seed_reserved_categories(&self) -> Result<(), AppError> {
        // Transfer legs come in both directions; the payment category is
        // expense-only.
        let reserved = [
            (TRANSFER_CATEGORY, Direction::Expense),
            (TRANSFER_CATEGORY, Direction::Income),
            (CARD_PAYMENT_CATEGORY, Direction::Expense),
        ];
        for (name, direction) in reserved {
            if self
                .repo
                .get_category_by_name(name, direction)
                .await?
                .is_none()
            {
                self.repo
                    .save_category(&Category::new(name.to_string(), direction))
                    .await?;
            }
        }
        Ok(())
    }

    // ========================
    // Account operations
    // ========================

    pub async fn create_account(
        &self,
        name: String,
        kind: AccountKind,
        description: Option<String>,
    ) -> Result<Account, AppError> {
        if self.repo.get_account_by_name(&name).await?.is_some() {
            return Err(AppError::AccountAlreadyExists(name));
        }

        let mut account = Account::new(name, kind);
        if let Some(desc) = description {
            account = account.with_description(desc);
        }

        self.repo.save_account(&account).await?;
        Ok(account)
    }

    pub async fn get_account(&self, name: &str) -> Result<Account, AppError> {
        self.repo
            .get_account_by_name(name)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(name.to_string()))
    }

    pub async fn list_accounts(&self, include_archived: bool) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts(include_archived).await?)
    }

    pub async fn archive_account(&self, name: &str) -> Result<Account, AppError> {
        let account = self.get_account(name).await?;
        self.repo.archive_account(account.id).await?;
        Ok(account)
    }

    /// Standing of one account: cash balance for debit, outstanding debt
    /// for credit.
    pub async fn account_standing(&self, name: &str) -> Result<AccountStanding, AppError> {
        let account = self.get_account(name).await?;
        let transactions = self.repo.list_transactions().await?;
        Ok(Self::standing_of(&account, &transactions))
    }

    pub async fn all_standings(&self) -> Result<Vec<AccountStanding>, AppError> {
        let accounts = self.repo.list_accounts(false).await?;
        let transactions = self.repo.list_transactions().await?;
        Ok(accounts
            .iter()
            .map(|account| Self::standing_of(account, &transactions))
            .collect())
    }

    fn standing_of(account: &Account, transactions: &[Transaction]) -> AccountStanding {
        let amount = match account.kind {
            AccountKind::Debit => account_balance(account.id, transactions),
            AccountKind::Credit => account_debt(account.id, transactions),
        };
        AccountStanding {
            account_id: account.id,
            name: account.name.clone(),
            kind: account.kind,
            amount,
        }
    }

    // ========================
    // Category operations
    // ========================

    pub async fn create_category(
        &self,
        name: String,
        direction: Direction,
    ) -> Result<Category, AppError> {
        if name == TRANSFER_CATEGORY || name == CARD_PAYMENT_CATEGORY {
            return Err(AppError::ReservedCategory { category: name });
        }
        if self
            .repo
            .get_category_by_name(&name, direction)
            .await?
            .is_some()
        {
            return Err(AppError::CategoryAlreadyExists(name));
        }

        let category = Category::new(name, direction);
        self.repo.save_category(&category).await?;
        Ok(category)
    }

    pub async fn list_categories(
        &self,
        direction: Option<Direction>,
    ) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories(direction).await?)
    }

    async fn get_category(
        &self,
        name: &str,
        direction: Direction,
    ) -> Result<Category, AppError> {
        if let Some(category) = self.repo.get_category_by_name(name, direction).await? {
            return Ok(category);
        }
        // Same name in the other direction gets a precise error instead of
        // a plain not-found.
        let other = match direction {
            Direction::Income => Direction::Expense,
            Direction::Expense => Direction::Income,
        };
        if let Some(category) = self.repo.get_category_by_name(name, other).await? {
            return Err(AppError::CategoryDirectionMismatch {
                category: category.name,
                category_direction: category.direction,
                requested: direction,
            });
        }
        Err(AppError::CategoryNotFound(name.to_string()))
    }

    /// Look up a spendable (non-reserved) category for a user-entered name.
    async fn get_plain_category(
        &self,
        name: &str,
        direction: Direction,
    ) -> Result<Category, AppError> {
        let category = self.get_category(name, direction).await?;
        if category.is_reserved() {
            return Err(AppError::ReservedCategory {
                category: category.name,
            });
        }
        Ok(category)
    }

    async fn active_account(&self, name: &str) -> Result<Account, AppError> {
        let account = self.get_account(name).await?;
        if account.is_archived() {
            return Err(AppError::AccountArchived(name.to_string()));
        }
        Ok(account)
    }

    // ========================
    // Recording operations
    // ========================

    /// Record a plain income or expense entry.
    pub async fn record_entry(
        &self,
        direction: Direction,
        account_name: &str,
        category_name: &str,
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let account = self.active_account(account_name).await?;
        let category = self.get_plain_category(category_name, direction).await?;

        let mut tx = Transaction::new(direction, category.id, account.id, amount_cents, date);
        if let Some(desc) = description {
            tx = tx.with_description(desc);
        }

        self.repo.save_transaction(&tx).await?;
        Ok(tx)
    }

    /// Record a transfer between two of the user's own accounts: a matched
    /// pair of legs saved atomically, neutral to income/expense totals.
    pub async fn record_transfer(
        &self,
        from_account_name: &str,
        to_account_name: &str,
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<TransferResult, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        if from_account_name == to_account_name {
            return Err(AppError::SameAccountTransfer(from_account_name.to_string()));
        }

        let from_account = self.active_account(from_account_name).await?;
        let to_account = self.active_account(to_account_name).await?;
        let out_category = self.get_category(TRANSFER_CATEGORY, Direction::Expense).await?;
        let in_category = self.get_category(TRANSFER_CATEGORY, Direction::Income).await?;

        let (mut out_leg, mut in_leg) = Transaction::transfer_pair(
            from_account.id,
            to_account.id,
            out_category.id,
            amount_cents,
            date,
        );
        in_leg.category_id = in_category.id;
        if let Some(desc) = description {
            out_leg = out_leg.with_description(desc.clone());
            in_leg = in_leg.with_description(desc);
        }

        self.repo.save_transaction_pair(&out_leg, &in_leg).await?;

        Ok(TransferResult {
            out_leg,
            in_leg,
            from_account_name: from_account.name,
            to_account_name: to_account.name,
        })
    }

    /// Record a credit-card charge: debt grows, no cash moves yet.
    pub async fn record_card_charge(
        &self,
        card_account_name: &str,
        category_name: &str,
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let card = self.active_account(card_account_name).await?;
        if !card.is_credit() {
            return Err(AppError::NotACreditAccount(card_account_name.to_string()));
        }
        let category = self
            .get_plain_category(category_name, Direction::Expense)
            .await?;

        let mut tx =
            Transaction::new(Direction::Expense, category.id, card.id, amount_cents, date)
                .as_card_charge();
        if let Some(desc) = description {
            tx = tx.with_description(desc);
        }

        self.repo.save_transaction(&tx).await?;
        Ok(tx)
    }

    /// Record a payment from a debit account that settles debt on a credit
    /// account. This is real cash leaving the debit account.
    pub async fn record_card_payment(
        &self,
        from_account_name: &str,
        card_account_name: &str,
        amount_cents: Cents,
        date: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        let from_account = self.active_account(from_account_name).await?;
        if from_account.is_credit() {
            return Err(AppError::NotADebitAccount(from_account_name.to_string()));
        }
        let card = self.active_account(card_account_name).await?;
        if !card.is_credit() {
            return Err(AppError::NotACreditAccount(card_account_name.to_string()));
        }

        let category = self
            .get_category(CARD_PAYMENT_CATEGORY, Direction::Expense)
            .await?;

        let mut tx = Transaction::new(
            Direction::Expense,
            category.id,
            from_account.id,
            amount_cents,
            date,
        )
        .as_payment_for(card.id);
        if let Some(desc) = description {
            tx = tx.with_description(desc);
        }

        self.repo.save_transaction(&tx).await?;
        Ok(tx)
    }

    // ========================
    // Editing and deletion
    // ========================

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.repo
            .get_transaction(id)
            .await?
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Apply an update. Plain entries accept every field; transfer and
    /// payment legs accept only amount and date, and amount/date changes to
    /// a transfer leg propagate to its paired leg atomically.
    pub async fn update_entry(
        &self,
        id: TransactionId,
        update: EntryUpdate,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.get_transaction(id).await?;

        if let Some(amount) = update.amount_cents {
            if amount <= 0 {
                return Err(AppError::InvalidAmount(
                    "Amount must be positive".to_string(),
                ));
            }
        }

        let restricted = tx.is_transfer_leg() || tx.is_card_payment();
        if restricted
            && (update.description.is_some()
                || update.category.is_some()
                || update.account.is_some())
        {
            let kind = if tx.is_transfer_leg() {
                "transfer"
            } else {
                "card payment"
            };
            return Err(AppError::RestrictedEdit { kind });
        }
        // A charge stays pinned to its credit account.
        if tx.is_card_charge && update.account.is_some() {
            return Err(AppError::RestrictedEdit { kind: "card charge" });
        }

        if let Some(amount) = update.amount_cents {
            tx.amount_cents = amount;
        }
        if let Some(date) = update.date {
            tx.date = date;
        }

        if let Some(link) = tx.transfer_link {
            self.repo
                .update_transfer_amount_date(link, tx.amount_cents, tx.date)
                .await?;
            return Ok(tx);
        }

        if let Some(desc) = update.description {
            tx.description = if desc.is_empty() { None } else { Some(desc) };
        }
        if let Some(category_name) = update.category {
            let category = self
                .get_plain_category(&category_name, tx.direction)
                .await?;
            tx.category_id = category.id;
        }
        if let Some(account_name) = update.account {
            let account = self.active_account(&account_name).await?;
            tx.account_id = account.id;
        }

        self.repo.update_transaction(&tx).await?;
        Ok(tx)
    }

    /// Delete an entry. Deleting either leg of a transfer removes both; an
    /// orphaned leg would silently skew one account's balance.
    pub async fn delete_entry(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let tx = self.get_transaction(id).await?;
        match tx.transfer_link {
            Some(link) => self.repo.delete_transfer_pair(link).await?,
            None => self.repo.delete_transaction(id).await?,
        }
        Ok(tx)
    }

    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let account_id = match &filter.account {
            Some(name) => Some(self.get_account(name).await?.id),
            None => None,
        };
        let category_id = match (&filter.category, filter.direction) {
            (Some(name), Some(direction)) => Some(self.get_category(name, direction).await?.id),
            (Some(name), None) => {
                // Direction unknown: try expense first, then income.
                let expense = self
                    .repo
                    .get_category_by_name(name, Direction::Expense)
                    .await?;
                let category = match expense {
                    Some(c) => c,
                    None => self.get_category(name, Direction::Income).await?,
                };
                Some(category.id)
            }
            (None, _) => None,
        };

        Ok(self
            .repo
            .list_transactions_filtered(
                account_id,
                category_id,
                filter.direction,
                filter.from_date,
                filter.to_date,
                filter.limit,
            )
            .await?)
    }

    // ========================
    // Reports
    // ========================

    pub async fn totals_report(&self, range: DateRange) -> Result<TotalsReport, AppError> {
        let transactions = self.repo.list_transactions().await?;
        Ok(TotalsReport {
            range,
            totals: totals(&transactions, &range),
        })
    }

    pub async fn category_report(
        &self,
        direction: Direction,
        range: DateRange,
        fold_card_payments: bool,
    ) -> Result<CategoryReport, AppError> {
        let transactions = self.repo.list_transactions().await?;
        let categories = self.repo.list_categories(None).await?;
        let rows = category_breakdown(
            &transactions,
            direction,
            &categories,
            &BreakdownOptions {
                fold_card_payments,
                range,
            },
        );
        let total = rows.iter().map(|r| r.total).sum();

        Ok(CategoryReport {
            direction,
            range,
            rows,
            total,
        })
    }

    pub async fn monthly_report(&self, months: usize) -> Result<MonthlyReport, AppError> {
        let transactions = self.repo.list_transactions().await?;
        Ok(MonthlyReport {
            months: monthly_series(&transactions, months, Utc::now()),
        })
    }

    pub async fn overview(&self) -> Result<OverviewReport, AppError> {
        let accounts = self.repo.list_accounts(false).await?;
        let transactions = self.repo.list_transactions().await?;
        Ok(OverviewReport {
            standings: accounts
                .iter()
                .map(|account| Self::standing_of(account, &transactions))
                .collect(),
            totals: totals(&transactions, &DateRange::unbounded()),
        })
    }

    // ========================
    // Summaries
    // ========================

    /// The resolved feed a summarization backend consumes.
    pub async fn summary_feed(&self, range: DateRange) -> Result<Vec<SummaryEntry>, AppError> {
        let transactions = self
            .repo
            .list_transactions_filtered(None, None, None, range.from, range.to, None)
            .await?;
        let accounts = self.repo.list_accounts(true).await?;
        let categories = self.repo.list_categories(None).await?;
        Ok(build_feed(&transactions, &accounts, &categories))
    }

    /// Run a summarizer over the period's feed. Backend failures surface as
    /// a recoverable error, never a crash.
    pub async fn summarize(
        &self,
        range: DateRange,
        summarizer: &dyn Summarizer,
    ) -> Result<String, AppError> {
        let feed = self.summary_feed(range).await?;
        summarizer
            .summarize(&feed)
            .map_err(|e| AppError::Summary(e.to_string()))
    }
}
