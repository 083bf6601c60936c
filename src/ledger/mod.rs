//! The append-only ledger of daily budget/spend entries.

mod balance;
mod entry;
mod store;

pub use balance::compute_balance;
pub use entry::LedgerEntry;
pub use store::{append_entry, create_summary_table, get_entries};
