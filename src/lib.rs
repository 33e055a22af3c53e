//! Federal Invest finance service library
//!
//! Fiscal deduction aggregation, DRE reporting, ledger entries and
//! role-based session authentication.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::{AppServices, Stores};
pub use modules::deductions;
pub use modules::dre;
pub use modules::ledger;
pub use modules::users;
