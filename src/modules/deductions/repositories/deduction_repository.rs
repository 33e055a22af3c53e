use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use std::ops::RangeInclusive;

use crate::core::Result;
use crate::modules::deductions::models::{MonthlyDeduction, QuarterlyDeduction};

/// Persistence of fiscal deductions keyed by `(year, month)`
#[async_trait]
pub trait DeductionStore: Send + Sync {
    /// Insert or overwrite the deduction for one month (last write wins)
    async fn upsert_month(&self, year: i32, month: u32, value: Decimal) -> Result<()>;

    /// Insert the deduction for one month only if no row exists yet.
    /// Returns true if a row was created.
    async fn insert_month_if_absent(&self, year: i32, month: u32, value: Decimal)
        -> Result<bool>;

    /// Stored rows for the given months of a year, ordered by month
    async fn find_months(
        &self,
        year: i32,
        months: RangeInclusive<u32>,
    ) -> Result<Vec<MonthlyDeduction>>;

    /// All legacy quarter-level rows
    async fn list_legacy_quarters(&self) -> Result<Vec<QuarterlyDeduction>>;
}

/// MySQL-backed deduction store (`monthly_tax_deductions`, `quarterly_tax_deductions`)
pub struct MySqlDeductionRepository {
    pool: MySqlPool,
}

impl MySqlDeductionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeductionStore for MySqlDeductionRepository {
    async fn upsert_month(&self, year: i32, month: u32, value: Decimal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO monthly_tax_deductions (year, month, value, created_at, updated_at)
            VALUES (?, ?, ?, NOW(), NOW())
            ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = NOW()
            "#,
        )
        .bind(year)
        .bind(month)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_month_if_absent(
        &self,
        year: i32,
        month: u32,
        value: Decimal,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO monthly_tax_deductions (year, month, value, created_at, updated_at)
            VALUES (?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(year)
        .bind(month)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_months(
        &self,
        year: i32,
        months: RangeInclusive<u32>,
    ) -> Result<Vec<MonthlyDeduction>> {
        let rows = sqlx::query_as::<_, MonthlyDeduction>(
            r#"
            SELECT year, month, value, created_at, updated_at
            FROM monthly_tax_deductions
            WHERE year = ? AND month BETWEEN ? AND ?
            ORDER BY month
            "#,
        )
        .bind(year)
        .bind(*months.start())
        .bind(*months.end())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_legacy_quarters(&self) -> Result<Vec<QuarterlyDeduction>> {
        let rows = sqlx::query_as::<_, QuarterlyDeduction>(
            r#"
            SELECT year, quarter, value
            FROM quarterly_tax_deductions
            ORDER BY year, quarter
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Process-local deduction store, used by tests and local runs without MySQL
#[derive(Debug, Default)]
pub struct InMemoryDeductionStore {
    months: DashMap<(i32, u32), MonthlyDeduction>,
    legacy: DashMap<(i32, u32), QuarterlyDeduction>,
}

impl InMemoryDeductionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a legacy quarterly row
    pub fn insert_legacy_quarter(&self, year: i32, quarter: u32, value: Decimal) {
        self.legacy.insert(
            (year, quarter),
            QuarterlyDeduction {
                year,
                quarter,
                value,
            },
        );
    }

    pub fn row_count(&self) -> usize {
        self.months.len()
    }
}

#[async_trait]
impl DeductionStore for InMemoryDeductionStore {
    async fn upsert_month(&self, year: i32, month: u32, value: Decimal) -> Result<()> {
        let now = Utc::now();
        self.months
            .entry((year, month))
            .and_modify(|row| {
                row.value = value;
                row.updated_at = now;
            })
            .or_insert_with(|| MonthlyDeduction {
                year,
                month,
                value,
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn insert_month_if_absent(
        &self,
        year: i32,
        month: u32,
        value: Decimal,
    ) -> Result<bool> {
        let mut created = false;
        self.months.entry((year, month)).or_insert_with(|| {
            created = true;
            let now = Utc::now();
            MonthlyDeduction {
                year,
                month,
                value,
                created_at: now,
                updated_at: now,
            }
        });
        Ok(created)
    }

    async fn find_months(
        &self,
        year: i32,
        months: RangeInclusive<u32>,
    ) -> Result<Vec<MonthlyDeduction>> {
        Ok(months
            .filter_map(|month| self.months.get(&(year, month)).map(|row| row.clone()))
            .collect())
    }

    async fn list_legacy_quarters(&self) -> Result<Vec<QuarterlyDeduction>> {
        let mut rows: Vec<QuarterlyDeduction> =
            self.legacy.iter().map(|row| row.value().clone()).collect();
        rows.sort_by_key(|row| (row.year, row.quarter));
        Ok(rows)
    }
}
