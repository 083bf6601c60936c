//! The domain type for one daily budget/spend record.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{auth::Identity, ledger::balance::compute_balance};

/// One submitted daily budget/spend record.
///
/// Entries are append-only: they are never updated or deleted, and several
/// entries may share the same date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The identity that owns this entry.
    pub username: Identity,
    /// The calendar date the entry was submitted, taken from the server
    /// clock rather than user input.
    pub date: Date,
    /// The budget the spending is measured against.
    pub budget: f64,
    /// Money spent on bills.
    pub bills: f64,
    /// Money spent on travel.
    pub travel: f64,
    /// Miscellaneous spending.
    pub misc: f64,
    /// The remaining balance, derived once at submission time and stored.
    pub balance: f64,
}

impl LedgerEntry {
    /// Create an entry for `date`, deriving the stored balance from the
    /// submitted amounts.
    pub fn new(
        username: Identity,
        date: Date,
        budget: f64,
        bills: f64,
        travel: f64,
        misc: f64,
    ) -> Self {
        Self {
            username,
            date,
            budget,
            bills,
            travel,
            misc,
            balance: compute_balance(budget, bills, travel, misc),
        }
    }

    /// The total amount spent across all categories.
    pub fn total_spend(&self) -> f64 {
        self.bills + self.travel + self.misc
    }
}

#[cfg(test)]
mod ledger_entry_tests {
    use time::macros::date;

    use crate::auth::Identity;

    use super::LedgerEntry;

    #[test]
    fn new_derives_the_balance() {
        let entry = LedgerEntry::new(
            Identity::new("alice"),
            date!(2024 - 01 - 01),
            1000.0,
            200.0,
            100.0,
            50.0,
        );

        assert_eq!(entry.balance, 650.0);
        assert_eq!(entry.total_spend(), 350.0);
    }
}
