pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EntryCategory, LedgerEntry, NewLedgerEntry};
pub use repositories::{InMemoryLedgerStore, LedgerStore, MySqlLedgerRepository};
pub use services::LedgerService;
