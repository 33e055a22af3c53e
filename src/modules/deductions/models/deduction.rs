use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fiscal deduction stored for one calendar month; the only persisted source of truth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyDeduction {
    pub year: i32,
    pub month: u32,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quarter-level deduction row from before monthly storage existed.
/// Only read by the legacy migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuarterlyDeduction {
    pub year: i32,
    pub quarter: u32,
    pub value: Decimal,
}

/// Outcome of redistributing legacy quarterly rows into months
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMigrationReport {
    pub quarters_scanned: usize,
    pub months_created: usize,
    pub months_skipped: usize,
}
