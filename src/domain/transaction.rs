use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, CategoryId, Cents, Direction};

pub type TransactionId = Uuid;
pub type TransferLinkId = Uuid;

/// A single ledger entry. The stored amount is always positive; whether it
/// adds or removes money is carried by `direction`.
///
/// Three special shapes exist on top of plain income/expense entries:
/// - a transfer leg (`transfer_link` set) is one half of a matched pair
///   moving money between two of the user's own accounts,
/// - a card charge (`is_card_charge`) is an expense on a credit account
///   that grows debt instead of spending cash,
/// - a card payment (`payment_for` set) is a debit-account expense that
///   settles debt on the named credit account.
///
/// A transfer leg is never also a charge or a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub direction: Direction,
    pub category_id: CategoryId,
    pub account_id: AccountId,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// When the transaction occurred in the real world
    pub date: DateTime<Utc>,
    /// When we recorded this entry in the system
    pub recorded_at: DateTime<Utc>,
    pub description: Option<String>,
    /// Shared by both legs of a transfer pair
    pub transfer_link: Option<TransferLinkId>,
    /// Expense on a credit account that increases debt rather than spending cash
    pub is_card_charge: bool,
    /// Credit account whose debt this expense settles
    pub payment_for: Option<AccountId>,
}

impl Transaction {
    pub fn new(
        direction: Direction,
        category_id: CategoryId,
        account_id: AccountId,
        amount_cents: Cents,
        date: DateTime<Utc>,
    ) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            direction,
            category_id,
            account_id,
            amount_cents,
            date,
            recorded_at: Utc::now(),
            description: None,
            transfer_link: None,
            is_card_charge: false,
            payment_for: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn as_card_charge(mut self) -> Self {
        self.is_card_charge = true;
        self
    }

    pub fn as_payment_for(mut self, credit_account: AccountId) -> Self {
        self.payment_for = Some(credit_account);
        self
    }

    /// Build the matched pair for a transfer: an expense leg on the source
    /// account and an income leg on the destination, equal amounts, sharing
    /// a fresh link id. The pair must be persisted atomically.
    pub fn transfer_pair(
        from_account: AccountId,
        to_account: AccountId,
        category_id: CategoryId,
        amount_cents: Cents,
        date: DateTime<Utc>,
    ) -> (Self, Self) {
        let link = Uuid::new_v4();

        let mut out_leg = Transaction::new(
            Direction::Expense,
            category_id,
            from_account,
            amount_cents,
            date,
        );
        out_leg.transfer_link = Some(link);

        let mut in_leg = Transaction::new(
            Direction::Income,
            category_id,
            to_account,
            amount_cents,
            date,
        );
        in_leg.transfer_link = Some(link);

        (out_leg, in_leg)
    }

    pub fn is_transfer_leg(&self) -> bool {
        self.transfer_link.is_some()
    }

    pub fn is_card_payment(&self) -> bool {
        self.payment_for.is_some()
    }

    /// Plain entries accept edits to every field; transfer and payment legs
    /// only to amount and date.
    pub fn is_plain(&self) -> bool {
        !self.is_transfer_leg() && !self.is_card_charge && !self.is_card_payment()
    }

    /// The signed contribution to the owning account's cash balance.
    pub fn signed_amount(&self) -> Cents {
        match self.direction {
            Direction::Income => self.amount_cents,
            Direction::Expense => -self.amount_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (AccountId, CategoryId) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_plain_entry() {
        let (account, category) = ids();
        let tx = Transaction::new(Direction::Expense, category, account, 4200, Utc::now())
            .with_description("groceries run");

        assert_eq!(tx.amount_cents, 4200);
        assert_eq!(tx.signed_amount(), -4200);
        assert!(tx.is_plain());
        assert!(!tx.is_transfer_leg());
    }

    #[test]
    fn test_transfer_pair_shares_link() {
        let (from, category) = ids();
        let to = Uuid::new_v4();
        let (out_leg, in_leg) = Transaction::transfer_pair(from, to, category, 5000, Utc::now());

        assert_eq!(out_leg.transfer_link, in_leg.transfer_link);
        assert!(out_leg.transfer_link.is_some());
        assert_eq!(out_leg.direction, Direction::Expense);
        assert_eq!(in_leg.direction, Direction::Income);
        assert_eq!(out_leg.account_id, from);
        assert_eq!(in_leg.account_id, to);
        assert_eq!(out_leg.amount_cents, in_leg.amount_cents);
        assert!(!out_leg.is_plain());
    }

    #[test]
    fn test_card_charge_and_payment_shapes() {
        let (card, category) = ids();
        let checking = Uuid::new_v4();

        let charge = Transaction::new(Direction::Expense, category, card, 1500, Utc::now())
            .as_card_charge();
        assert!(charge.is_card_charge);
        assert!(!charge.is_plain());

        let payment = Transaction::new(Direction::Expense, category, checking, 1500, Utc::now())
            .as_payment_for(card);
        assert_eq!(payment.payment_for, Some(card));
        assert!(payment.is_card_payment());
    }

    #[test]
    #[should_panic(expected = "Transaction amount must be positive")]
    fn test_requires_positive_amount() {
        let (account, category) = ids();
        Transaction::new(Direction::Income, category, account, 0, Utc::now());
    }
}
