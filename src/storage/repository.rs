use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Account, AccountId, AccountKind, Category, CategoryId, Direction, Transaction, TransactionId,
    TransferLinkId,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying accounts, categories and
/// transactions. Pure CRUD plus filtered listing; all balance/report
/// derivation happens in `domain::ledger` over loaded snapshots.
pub struct Repository {
    pool: SqlitePool,
}

const TX_COLUMNS: &str = "id, direction, category_id, account_id, amount_cents, date, recorded_at, description, transfer_link, is_card_charge, payment_for";

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    pub async fn save_account(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, name, kind, description, created_at, archived_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.name)
        .bind(account.kind.as_str())
        .bind(&account.description)
        .bind(account.created_at.to_rfc3339())
        .bind(account.archived_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .context("Failed to save account")?;
        Ok(())
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, name, kind, description, created_at, archived_at FROM accounts WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    pub async fn get_account_by_name(&self, name: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, name, kind, description, created_at, archived_at FROM accounts WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by name")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    pub async fn list_accounts(&self, include_archived: bool) -> Result<Vec<Account>> {
        let query = if include_archived {
            "SELECT id, name, kind, description, created_at, archived_at FROM accounts ORDER BY name"
        } else {
            "SELECT id, name, kind, description, created_at, archived_at FROM accounts WHERE archived_at IS NULL ORDER BY name"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Archive an account (soft delete). Its history keeps aggregating.
    pub async fn archive_account(&self, id: AccountId) -> Result<()> {
        sqlx::query("UPDATE accounts SET archived_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to archive account")?;
        Ok(())
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let created_at_str: String = row.get("created_at");
        let archived_at_str: Option<String> = row.get("archived_at");

        Ok(Account {
            id: Uuid::parse_str(&id_str).context("Invalid account ID")?,
            name: row.get("name"),
            kind: AccountKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid account kind: {}", kind_str))?,
            description: row.get("description"),
            created_at: parse_timestamp(&created_at_str)?,
            archived_at: archived_at_str.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    // ========================
    // Category operations
    // ========================

    pub async fn save_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, direction, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(category.direction.as_str())
        .bind(category.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save category")?;
        Ok(())
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row =
            sqlx::query("SELECT id, name, direction, created_at FROM categories WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .context("Failed to fetch category")?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    pub async fn get_category_by_name(
        &self,
        name: &str,
        direction: Direction,
    ) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, direction, created_at FROM categories WHERE name = ? AND direction = ?",
        )
        .bind(name)
        .bind(direction.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category by name")?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    pub async fn list_categories(&self, direction: Option<Direction>) -> Result<Vec<Category>> {
        let rows = match direction {
            Some(dir) => sqlx::query(
                "SELECT id, name, direction, created_at FROM categories WHERE direction = ? ORDER BY name",
            )
            .bind(dir.as_str())
            .fetch_all(&self.pool)
            .await,
            None => {
                sqlx::query("SELECT id, name, direction, created_at FROM categories ORDER BY name")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
        let id_str: String = row.get("id");
        let direction_str: String = row.get("direction");
        let created_at_str: String = row.get("created_at");

        Ok(Category {
            id: Uuid::parse_str(&id_str).context("Invalid category ID")?,
            name: row.get("name"),
            direction: Direction::from_str(&direction_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid direction: {}", direction_str))?,
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    // ========================
    // Transaction operations
    // ========================

    pub async fn save_transaction(&self, tx: &Transaction) -> Result<()> {
        Self::insert_transaction(&self.pool, tx).await
    }

    /// Save both legs of a transfer in one SQL transaction; either both
    /// legs land or neither does.
    pub async fn save_transaction_pair(
        &self,
        first: &Transaction,
        second: &Transaction,
    ) -> Result<()> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;
        Self::insert_transaction(&mut *db_tx, first).await?;
        Self::insert_transaction(&mut *db_tx, second).await?;
        db_tx
            .commit()
            .await
            .context("Failed to commit transfer pair")?;
        Ok(())
    }

    async fn insert_transaction<'e, E>(executor: E, tx: &Transaction) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, direction, category_id, account_id, amount_cents, date, recorded_at, description, transfer_link, is_card_charge, payment_for)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.to_string())
        .bind(tx.direction.as_str())
        .bind(tx.category_id.to_string())
        .bind(tx.account_id.to_string())
        .bind(tx.amount_cents)
        .bind(tx.date.to_rfc3339())
        .bind(tx.recorded_at.to_rfc3339())
        .bind(&tx.description)
        .bind(tx.transfer_link.map(|id| id.to_string()))
        .bind(tx.is_card_charge)
        .bind(tx.payment_for.map(|id| id.to_string()))
        .execute(executor)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// Both legs of a transfer, in insertion order.
    pub async fn get_transfer_legs(&self, link: TransferLinkId) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE transfer_link = ? ORDER BY recorded_at, id"
        ))
        .bind(link.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch transfer legs")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions ORDER BY date, recorded_at"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// List transactions with optional filters.
    pub async fn list_transactions_filtered(
        &self,
        account_id: Option<AccountId>,
        category_id: Option<CategoryId>,
        direction: Option<Direction>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>> {
        // Build query dynamically based on filters
        let mut query = format!("SELECT {TX_COLUMNS} FROM transactions WHERE 1=1");

        // Collect string bindings first so they live long enough
        let account_id_str = account_id.map(|id| id.to_string());
        let category_id_str = category_id.map(|id| id.to_string());
        let from_date_str = from_date.map(|dt| dt.to_rfc3339());
        let to_date_str = to_date.map(|dt| dt.to_rfc3339());

        if account_id.is_some() {
            query.push_str(" AND account_id = ?");
        }
        if category_id.is_some() {
            query.push_str(" AND category_id = ?");
        }
        if direction.is_some() {
            query.push_str(" AND direction = ?");
        }
        if from_date.is_some() {
            query.push_str(" AND date >= ?");
        }
        if to_date.is_some() {
            query.push_str(" AND date <= ?");
        }

        query.push_str(" ORDER BY date, recorded_at");

        if let Some(lim) = limit {
            query.push_str(&format!(" LIMIT {}", lim));
        }

        let mut sql_query = sqlx::query(&query);
        if let Some(ref aid) = account_id_str {
            sql_query = sql_query.bind(aid);
        }
        if let Some(ref cid) = category_id_str {
            sql_query = sql_query.bind(cid);
        }
        if let Some(dir) = direction {
            sql_query = sql_query.bind(dir.as_str());
        }
        if let Some(ref fd) = from_date_str {
            sql_query = sql_query.bind(fd);
        }
        if let Some(ref td) = to_date_str {
            sql_query = sql_query.bind(td);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list filtered transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Update the mutable fields of a single transaction.
    pub async fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET direction = ?, category_id = ?, account_id = ?, amount_cents = ?, date = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(tx.direction.as_str())
        .bind(tx.category_id.to_string())
        .bind(tx.account_id.to_string())
        .bind(tx.amount_cents)
        .bind(tx.date.to_rfc3339())
        .bind(&tx.description)
        .bind(tx.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;
        Ok(())
    }

    /// Apply a new amount/date to both legs of a transfer atomically.
    pub async fn update_transfer_amount_date(
        &self,
        link: TransferLinkId,
        amount_cents: i64,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;
        sqlx::query("UPDATE transactions SET amount_cents = ?, date = ? WHERE transfer_link = ?")
            .bind(amount_cents)
            .bind(date.to_rfc3339())
            .bind(link.to_string())
            .execute(&mut *db_tx)
            .await
            .context("Failed to update transfer pair")?;
        db_tx
            .commit()
            .await
            .context("Failed to commit transfer update")?;
        Ok(())
    }

    pub async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(())
    }

    /// Delete both legs of a transfer; a lone orphaned leg would silently
    /// skew one account's balance.
    pub async fn delete_transfer_pair(&self, link: TransferLinkId) -> Result<()> {
        sqlx::query("DELETE FROM transactions WHERE transfer_link = ?")
            .bind(link.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transfer pair")?;
        Ok(())
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let direction_str: String = row.get("direction");
        let category_str: String = row.get("category_id");
        let account_str: String = row.get("account_id");
        let date_str: String = row.get("date");
        let recorded_at_str: String = row.get("recorded_at");
        let transfer_link_str: Option<String> = row.get("transfer_link");
        let payment_for_str: Option<String> = row.get("payment_for");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            direction: Direction::from_str(&direction_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid direction: {}", direction_str))?,
            category_id: Uuid::parse_str(&category_str).context("Invalid category ID")?,
            account_id: Uuid::parse_str(&account_str).context("Invalid account ID")?,
            amount_cents: row.get("amount_cents"),
            date: parse_timestamp(&date_str)?,
            recorded_at: parse_timestamp(&recorded_at_str)?,
            description: row.get("description"),
            transfer_link: transfer_link_str
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .context("Invalid transfer link")?,
            is_card_charge: row.get::<i32, _>("is_card_charge") != 0,
            payment_for: payment_for_str
                .map(|s| Uuid::parse_str(&s))
                .transpose()
                .context("Invalid payment_for ID")?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .context("Invalid timestamp")?
        .with_timezone(&Utc))
}
