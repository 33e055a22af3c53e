pub mod deduction;

pub use deduction::{LegacyMigrationReport, MonthlyDeduction, QuarterlyDeduction};
