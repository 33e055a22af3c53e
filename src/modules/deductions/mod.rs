pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{MonthlyDeduction, QuarterlyDeduction};
pub use repositories::{DeductionStore, InMemoryDeductionStore, MySqlDeductionRepository};
pub use services::AggregationEngine;
