pub mod ledger_entry;

pub use ledger_entry::{CategoryTotal, EntryCategory, LedgerEntry, LedgerEntryRow, NewLedgerEntry};
