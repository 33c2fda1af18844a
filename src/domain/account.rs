use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Cash-like accounts (checking, savings, cash). Balance is money held.
    Debit,
    /// Lines of credit (credit cards). Balance is outstanding debt.
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Debit => "debit",
            AccountKind::Credit => "credit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(AccountKind::Debit),
            "credit" => Some(AccountKind::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An account owned by the user. The kind is fixed at creation: a debit
/// account carries a cash balance, a credit account carries a debt balance,
/// never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub kind: AccountKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(name: String, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            description: None,
            created_at: Utc::now(),
            archived_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn is_credit(&self) -> bool {
        self.kind == AccountKind::Credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_roundtrip() {
        for kind in [AccountKind::Debit, AccountKind::Credit] {
            assert_eq!(AccountKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(AccountKind::from_str("checking"), None);
    }

    #[test]
    fn test_new_account_is_active() {
        let account = Account::new("Visa".into(), AccountKind::Credit);
        assert!(!account.is_archived());
        assert!(account.is_credit());
    }
}
