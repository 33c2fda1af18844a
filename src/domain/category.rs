use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Reserved category for the two legs of an account-to-account transfer.
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Reserved category for payments that settle credit-card debt.
pub const CARD_PAYMENT_CATEGORY: &str = "Credit Card Payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Direction::Income),
            "expense" => Some(Direction::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labeled bucket for one direction of money movement. Reserved categories
/// ("Transfer", "Credit Card Payment") mark movement between the user's own
/// accounts and are excluded from spending breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, direction: Direction) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            direction,
            created_at: Utc::now(),
        }
    }

    /// True for the built-in categories that represent internal movement.
    pub fn is_reserved(&self) -> bool {
        self.name == TRANSFER_CATEGORY || self.name == CARD_PAYMENT_CATEGORY
    }
}
