mod ledger_controller;

pub use ledger_controller::{configure, create_entry, list_entries};
