pub mod deduction_repository;

pub use deduction_repository::{DeductionStore, InMemoryDeductionStore, MySqlDeductionRepository};
