use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AccountId, Category, CategoryId, Cents, Direction, Transaction, CARD_PAYMENT_CATEGORY,
};

/// Optional date window, inclusive on both bounds. An unset side is open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}

/// Cash balance of a debit account: the signed sum of its own entries,
/// transfer and payment legs included. May go negative (overdraft is
/// representable; discouraging it is a form concern, not a ledger one).
pub fn account_balance(account_id: AccountId, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.account_id == account_id)
        .map(|tx| tx.signed_amount())
        .sum()
}

/// Outstanding debt of a credit account: charges on the account minus
/// payments (recorded on debit accounts) that name it. The raw signed value
/// is returned; over-payment yields a negative number and display clamping
/// is left to callers.
pub fn account_debt(account_id: AccountId, transactions: &[Transaction]) -> Cents {
    transactions.iter().fold(0, |debt, tx| {
        if tx.is_card_charge && tx.account_id == account_id {
            debt + tx.amount_cents
        } else if tx.payment_for == Some(account_id) {
            debt - tx.amount_cents
        } else {
            debt
        }
    })
}

/// Global totals over a date window.
///
/// `outstanding_debt` is charges net of payments within the window; the
/// per-month gross figure lives in [`MonthSummary::new_charges`] and is a
/// different quantity on purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Cents,
    pub expenses: Cents,
    pub outstanding_debt: Cents,
    pub balance: Cents,
}

pub fn totals(transactions: &[Transaction], range: &DateRange) -> Totals {
    let mut acc = Totals::default();

    for tx in transactions.iter().filter(|tx| range.contains(tx.date)) {
        // Transfer pairs cancel out between the user's own accounts and are
        // neither income nor expense.
        if !tx.is_transfer_leg() {
            match tx.direction {
                Direction::Income => acc.income += tx.amount_cents,
                // A raw card charge is not yet cash leaving a debit account;
                // the payment leg that settles it is counted instead.
                Direction::Expense if !tx.is_card_charge => acc.expenses += tx.amount_cents,
                Direction::Expense => {}
            }
        }
        if tx.is_card_charge {
            acc.outstanding_debt += tx.amount_cents;
        }
        if tx.payment_for.is_some() {
            acc.outstanding_debt -= tx.amount_cents;
        }
    }

    acc.balance = acc.income - acc.expenses;
    acc
}

/// One row of a category breakdown. `category_id` is `None` only for the
/// synthetic card-payment bucket when the catalog lacks the reserved
/// category, or when the transaction points at an unknown category (the
/// label then falls back to the raw id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Option<CategoryId>,
    pub label: String,
    pub total: Cents,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownOptions {
    /// Fold all card-payment legs into one "Credit Card Payment" bucket.
    pub fold_card_payments: bool,
    pub range: DateRange,
}

/// Group one direction's transactions by category, excluding internal
/// movement: transfer legs, the reserved Transfer category, and (for
/// expenses) raw card charges. Sorted by total descending, ties by category
/// id ascending; rows with total <= 0 are dropped.
pub fn category_breakdown(
    transactions: &[Transaction],
    direction: Direction,
    categories: &[Category],
    opts: &BreakdownOptions,
) -> Vec<CategoryTotal> {
    let by_id: HashMap<CategoryId, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let payment_bucket_id = categories
        .iter()
        .find(|c| c.name == CARD_PAYMENT_CATEGORY)
        .map(|c| c.id);

    let mut groups: HashMap<Option<CategoryId>, Cents> = HashMap::new();
    let mut folded_payments: Cents = 0;

    for tx in transactions.iter().filter(|tx| opts.range.contains(tx.date)) {
        if tx.direction != direction || tx.is_transfer_leg() {
            continue;
        }
        if direction == Direction::Expense && tx.is_card_charge {
            continue;
        }
        if opts.fold_card_payments && tx.is_card_payment() {
            folded_payments += tx.amount_cents;
            continue;
        }
        match by_id.get(&tx.category_id) {
            // Reserved categories mark movement between the user's own
            // accounts; counting them would double-count.
            Some(cat) if cat.is_reserved() => continue,
            Some(_) => *groups.entry(Some(tx.category_id)).or_insert(0) += tx.amount_cents,
            // Dangling reference: keep the money visible under the raw id.
            None => *groups.entry(Some(tx.category_id)).or_insert(0) += tx.amount_cents,
        }
    }

    let mut rows: Vec<CategoryTotal> = groups
        .into_iter()
        .filter(|(_, total)| *total > 0)
        .map(|(id, total)| {
            let label = id
                .and_then(|id| by_id.get(&id).map(|c| c.name.clone()))
                .unwrap_or_else(|| id.map(|id| id.to_string()).unwrap_or_default());
            CategoryTotal {
                category_id: id,
                label,
                total,
            }
        })
        .collect();

    if folded_payments > 0 {
        rows.push(CategoryTotal {
            category_id: payment_bucket_id,
            label: CARD_PAYMENT_CATEGORY.to_string(),
            total: folded_payments,
        });
    }

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    rows
}

/// One calendar-month bucket of the monthly series.
///
/// `new_charges` is the month's gross card charges, deliberately not netted
/// against payments: it answers "how much new debt was incurred", while
/// [`Totals::outstanding_debt`] answers "how much is still owed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub income: Cents,
    pub expenses: Cents,
    pub new_charges: Cents,
}

impl MonthSummary {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Exactly `months` consecutive calendar-month buckets ending at the month
/// of `now`, oldest first, zero-filled where nothing matched.
pub fn monthly_series(
    transactions: &[Transaction],
    months: usize,
    now: DateTime<Utc>,
) -> Vec<MonthSummary> {
    let mut series = Vec::with_capacity(months);

    for back in (0..months).rev() {
        let (year, month) = shift_month(now.year(), now.month(), back as i32);
        let mut summary = MonthSummary {
            year,
            month,
            income: 0,
            expenses: 0,
            new_charges: 0,
        };

        for tx in transactions
            .iter()
            .filter(|tx| tx.date.year() == year && tx.date.month() == month)
        {
            if !tx.is_transfer_leg() {
                match tx.direction {
                    Direction::Income => summary.income += tx.amount_cents,
                    Direction::Expense if !tx.is_card_charge => {
                        summary.expenses += tx.amount_cents
                    }
                    Direction::Expense => {}
                }
            }
            if tx.is_card_charge {
                summary.new_charges += tx.amount_cents;
            }
        }

        series.push(summary);
    }

    series
}

/// Step a (year, month) pair backwards by `back` months.
fn shift_month(year: i32, month: u32, back: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Transaction, TRANSFER_CATEGORY};

    fn date(spec: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("{spec}T00:00:00Z"))
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(
        direction: Direction,
        account: AccountId,
        category: CategoryId,
        amount: Cents,
        day: &str,
    ) -> Transaction {
        Transaction::new(direction, category, account, amount, date(day))
    }

    #[test]
    fn test_account_balance_ignores_other_accounts() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let txns = vec![
            entry(Direction::Income, a, cat, 100_000, "2024-01-01"),
            entry(Direction::Expense, a, cat, 30_000, "2024-01-10"),
            entry(Direction::Income, b, cat, 999_999, "2024-01-15"),
        ];

        assert_eq!(account_balance(a, &txns), 70_000);
        assert_eq!(account_balance(b, &txns), 999_999);
        assert_eq!(account_balance(Uuid::new_v4(), &txns), 0);
    }

    #[test]
    fn test_account_balance_counts_transfer_and_payment_legs() {
        let checking = Uuid::new_v4();
        let savings = Uuid::new_v4();
        let card = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let (out_leg, in_leg) =
            Transaction::transfer_pair(checking, savings, cat, 20_000, date("2024-02-01"));
        let payment = entry(Direction::Expense, checking, cat, 15_000, "2024-02-05")
            .as_payment_for(card);

        let txns = vec![out_leg, in_leg, payment];
        assert_eq!(account_balance(checking, &txns), -35_000);
        assert_eq!(account_balance(savings, &txns), 20_000);
    }

    #[test]
    fn test_account_debt_nets_payments() {
        let card = Uuid::new_v4();
        let other_card = Uuid::new_v4();
        let checking = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let txns = vec![
            entry(Direction::Expense, card, cat, 15_000, "2024-01-05").as_card_charge(),
            entry(Direction::Expense, card, cat, 5_000, "2024-01-08").as_card_charge(),
            entry(Direction::Expense, checking, cat, 15_000, "2024-01-20").as_payment_for(card),
            entry(Direction::Expense, other_card, cat, 77_000, "2024-01-21").as_card_charge(),
        ];

        assert_eq!(account_debt(card, &txns), 5_000);
        assert_eq!(account_debt(other_card, &txns), 77_000);
    }

    #[test]
    fn test_account_debt_overpayment_goes_negative() {
        let card = Uuid::new_v4();
        let checking = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let txns = vec![
            entry(Direction::Expense, card, cat, 10_000, "2024-01-05").as_card_charge(),
            entry(Direction::Expense, checking, cat, 12_000, "2024-01-20").as_payment_for(card),
        ];

        assert_eq!(account_debt(card, &txns), -2_000);
    }

    #[test]
    fn test_totals_balance_identity() {
        let account = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let txns = vec![
            entry(Direction::Income, account, cat, 100_000, "2024-01-01"),
            entry(Direction::Expense, account, cat, 30_000, "2024-01-02"),
            entry(Direction::Expense, account, cat, 12_500, "2024-01-03"),
        ];

        let t = totals(&txns, &DateRange::unbounded());
        assert_eq!(t.income, 100_000);
        assert_eq!(t.expenses, 42_500);
        assert_eq!(t.balance, t.income - t.expenses);
    }

    #[test]
    fn test_totals_transfer_pair_is_neutral() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let (out_leg, in_leg) = Transaction::transfer_pair(a, b, cat, 20_000, date("2024-03-01"));
        let txns = vec![out_leg, in_leg];

        let t = totals(&txns, &DateRange::unbounded());
        assert_eq!(t.income, 0);
        assert_eq!(t.expenses, 0);
        assert_eq!(account_balance(a, &txns), -20_000);
        assert_eq!(account_balance(b, &txns), 20_000);
    }

    #[test]
    fn test_totals_counts_payment_not_charge() {
        let card = Uuid::new_v4();
        let checking = Uuid::new_v4();
        let cat = Uuid::new_v4();

        let txns = vec![
            entry(Direction::Expense, card, cat, 15_000, "2024-01-05").as_card_charge(),
            entry(Direction::Expense, checking, cat, 15_000, "2024-01-20").as_payment_for(card),
        ];

        let t = totals(&txns, &DateRange::unbounded());
        assert_eq!(t.expenses, 15_000); // the payment, not the charge
        assert_eq!(t.outstanding_debt, 0); // charge settled in full
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let account = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let txns = vec![
            entry(Direction::Income, account, cat, 100, "2024-01-01"),
            entry(Direction::Income, account, cat, 200, "2024-01-15"),
            entry(Direction::Income, account, cat, 400, "2024-01-31"),
            entry(Direction::Income, account, cat, 800, "2024-02-01"),
        ];

        let range = DateRange::new(Some(date("2024-01-01")), Some(date("2024-01-31")));
        let t = totals(&txns, &range);
        assert_eq!(t.income, 700); // both boundary days in, Feb 1 out

        let open_start = DateRange::new(None, Some(date("2024-01-15")));
        assert_eq!(totals(&txns, &open_start).income, 300);
    }

    #[test]
    fn test_breakdown_sorting_and_exclusions() {
        let account = Uuid::new_v4();
        let savings = Uuid::new_v4();

        let groceries = Category::new("Groceries".into(), Direction::Expense);
        let rent = Category::new("Rent".into(), Direction::Expense);
        let transfer = Category::new(TRANSFER_CATEGORY.into(), Direction::Expense);
        let categories = vec![groceries.clone(), rent.clone(), transfer.clone()];

        let (out_leg, in_leg) =
            Transaction::transfer_pair(account, savings, transfer.id, 50_000, date("2024-01-02"));
        let txns = vec![
            entry(Direction::Expense, account, groceries.id, 20_000, "2024-01-05"),
            entry(Direction::Expense, account, rent.id, 120_000, "2024-01-01"),
            entry(Direction::Expense, account, groceries.id, 15_000, "2024-01-12"),
            out_leg,
            in_leg,
        ];

        let rows = category_breakdown(
            &txns,
            Direction::Expense,
            &categories,
            &BreakdownOptions::default(),
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Rent");
        assert_eq!(rows[0].total, 120_000);
        assert_eq!(rows[1].label, "Groceries");
        assert_eq!(rows[1].total, 35_000);
        assert!(rows.iter().all(|r| r.label != TRANSFER_CATEGORY));
        assert!(rows.iter().all(|r| r.total > 0));
    }

    #[test]
    fn test_breakdown_folds_card_payments() {
        let checking = Uuid::new_v4();
        let card = Uuid::new_v4();

        let groceries = Category::new("Groceries".into(), Direction::Expense);
        let payment_cat = Category::new(CARD_PAYMENT_CATEGORY.into(), Direction::Expense);
        let categories = vec![groceries.clone(), payment_cat.clone()];

        let txns = vec![
            entry(Direction::Expense, checking, groceries.id, 8_000, "2024-01-03"),
            entry(Direction::Expense, card, groceries.id, 30_000, "2024-01-04").as_card_charge(),
            entry(Direction::Expense, checking, payment_cat.id, 25_000, "2024-01-20")
                .as_payment_for(card),
        ];

        // Folded: payments appear as one synthetic bucket.
        let folded = category_breakdown(
            &txns,
            Direction::Expense,
            &categories,
            &BreakdownOptions {
                fold_card_payments: true,
                range: DateRange::unbounded(),
            },
        );
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].label, CARD_PAYMENT_CATEGORY);
        assert_eq!(folded[0].total, 25_000);
        assert_eq!(folded[0].category_id, Some(payment_cat.id));

        // Unfolded: the payment sits in the reserved category, which is
        // excluded; raw charges are excluded either way.
        let unfolded = category_breakdown(
            &txns,
            Direction::Expense,
            &categories,
            &BreakdownOptions::default(),
        );
        assert_eq!(unfolded.len(), 1);
        assert_eq!(unfolded[0].label, "Groceries");
        assert_eq!(unfolded[0].total, 8_000);
    }

    #[test]
    fn test_breakdown_dangling_category_uses_raw_id() {
        let account = Uuid::new_v4();
        let ghost = Uuid::new_v4();

        let txns = vec![entry(Direction::Expense, account, ghost, 5_000, "2024-01-03")];
        let rows = category_breakdown(
            &txns,
            Direction::Expense,
            &[],
            &BreakdownOptions::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, ghost.to_string());
        assert_eq!(rows[0].total, 5_000);
    }

    #[test]
    fn test_monthly_series_zero_fills() {
        let account = Uuid::new_v4();
        let card = Uuid::new_v4();
        let cat = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        let checking_txns = vec![
            entry(Direction::Income, account, cat, 500_000, "2024-05-01"),
            entry(Direction::Expense, account, cat, 120_000, "2024-05-10"),
            entry(Direction::Expense, card, cat, 40_000, "2024-06-02").as_card_charge(),
            entry(Direction::Expense, account, cat, 40_000, "2024-06-20").as_payment_for(card),
        ];

        let series = monthly_series(&checking_txns, 12, now);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].label(), "2023-07");
        assert_eq!(series[11].label(), "2024-06");

        let may = &series[10];
        assert_eq!(may.income, 500_000);
        assert_eq!(may.expenses, 120_000);
        assert_eq!(may.new_charges, 0);

        // Gross charges for the month, not netted against the payment.
        let june = &series[11];
        assert_eq!(june.new_charges, 40_000);
        assert_eq!(june.expenses, 40_000);

        // Empty months are zero-filled, never missing.
        assert!(series[..10].iter().all(|m| m.income == 0
            && m.expenses == 0
            && m.new_charges == 0));
    }

    #[test]
    fn test_shift_month_crosses_year() {
        assert_eq!(shift_month(2024, 3, 0), (2024, 3));
        assert_eq!(shift_month(2024, 3, 3), (2023, 12));
        assert_eq!(shift_month(2024, 1, 13), (2022, 12));
    }
}
