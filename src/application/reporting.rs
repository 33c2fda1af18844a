use serde::{Deserialize, Serialize};

use crate::domain::{
    AccountId, AccountKind, CategoryTotal, Cents, DateRange, Direction, MonthSummary, Totals,
};

/// Derived position of one account: cash for debit accounts, outstanding
/// debt for credit accounts. The two are mutually exclusive readings of the
/// same fold, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStanding {
    pub account_id: AccountId,
    pub name: String,
    pub kind: AccountKind,
    pub amount: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewReport {
    pub standings: Vec<AccountStanding>,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsReport {
    pub range: DateRange,
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub direction: Direction,
    pub range: DateRange,
    pub rows: Vec<CategoryTotal>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthSummary>,
}
