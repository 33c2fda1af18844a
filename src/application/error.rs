use thiserror::Error;

use crate::domain::Direction;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Account is archived: {0}")]
    AccountArchived(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category already exists: {0}")]
    CategoryAlreadyExists(String),

    #[error("Category '{category}' is reserved for internal movement")]
    ReservedCategory { category: String },

    #[error("Category '{category}' is an {category_direction} category, not {requested}")]
    CategoryDirectionMismatch {
        category: String,
        category_direction: Direction,
        requested: Direction,
    },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("'{0}' is not a credit account")]
    NotACreditAccount(String),

    #[error("'{0}' is not a debit account")]
    NotADebitAccount(String),

    #[error("Cannot transfer from '{0}' to itself")]
    SameAccountTransfer(String),

    #[error("Only amount and date can be edited on a {kind} entry")]
    RestrictedEdit { kind: &'static str },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Summary generation failed: {0}")]
    Summary(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
