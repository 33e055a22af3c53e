use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::{money, split_evenly, AppError, Period, Result};
use crate::modules::deductions::models::{LegacyMigrationReport, MonthlyDeduction};
use crate::modules::deductions::repositories::DeductionStore;
use crate::modules::dre::services::DreCache;

/// Converts deductions entered at any granularity into monthly rows and sums
/// them back up on read.
///
/// Quarterly and annual values are never stored: a quarter is written as three
/// months of `value / 3`, a year as twelve months of `value / 12`, with the
/// cent remainder on the last month so that `read` returns exactly what was
/// written.
#[derive(Clone)]
pub struct AggregationEngine {
    store: Arc<dyn DeductionStore>,
    cache: Arc<DreCache>,
}

impl AggregationEngine {
    pub fn new(store: Arc<dyn DeductionStore>, cache: Arc<DreCache>) -> Self {
        Self { store, cache }
    }

    /// Store `value` as the deduction of `period`.
    ///
    /// # Errors
    /// Validation error for negative values, values above
    /// [`money::MAX_AMOUNT`] or values with more than two decimal places;
    /// nothing is written in that case. Persistence errors
    /// stop the fan-out; months written before the failure are kept.
    pub async fn write(&self, period: &Period, value: Decimal) -> Result<()> {
        money::validate_amount("deduction value", value).map_err(AppError::Validation)?;

        let months: Vec<u32> = period.months().collect();
        let shares = split_evenly(value, months.len() as u32);

        let mut written = Vec::with_capacity(months.len());
        for (month, share) in months.iter().copied().zip(shares) {
            if let Err(err) = self.store.upsert_month(period.year(), month, share).await {
                error!(
                    period = %period,
                    month,
                    written_months = ?written,
                    error = %err,
                    "Deduction fan-out failed part way"
                );
                // Earlier months already changed
                self.cache.invalidate_overlapping(period);
                return Err(err);
            }
            written.push(month);
        }

        self.cache.invalidate_overlapping(period);

        info!(
            period = %period,
            value = %value,
            months = written.len(),
            "Fiscal deduction saved"
        );
        Ok(())
    }

    /// Total deduction of `period`; months without a row count as zero
    pub async fn read(&self, period: &Period) -> Result<Decimal> {
        let rows = self.store.find_months(period.year(), period.months()).await?;
        rows.iter()
            .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(row.value))
            .ok_or_else(|| AppError::validation(format!("deduction total of {} overflowed", period)))
    }

    /// Stored monthly rows inside `period`
    pub async fn breakdown(&self, period: &Period) -> Result<Vec<MonthlyDeduction>> {
        self.store.find_months(period.year(), period.months()).await
    }

    /// Redistribute every legacy quarterly row into its three months.
    ///
    /// Months that already have a monthly row are left alone, which also makes
    /// a second run a no-op.
    pub async fn migrate_legacy_quarterly(&self) -> Result<LegacyMigrationReport> {
        let legacy = self.store.list_legacy_quarters().await?;
        let mut report = LegacyMigrationReport::default();

        for row in legacy {
            let period = match Period::quarterly(row.year, row.quarter) {
                Ok(period) => period,
                Err(err) => {
                    warn!(
                        year = row.year,
                        quarter = row.quarter,
                        error = %err,
                        "Skipping malformed legacy deduction"
                    );
                    continue;
                }
            };
            report.quarters_scanned += 1;

            let value = if row.value.is_sign_negative() {
                warn!(period = %period, value = %row.value, "Legacy deduction is negative, using zero");
                Decimal::ZERO
            } else {
                money::round_cents(row.value)
            };

            let mut touched = false;
            for (month, share) in period.months().zip(split_evenly(value, 3)) {
                if self
                    .store
                    .insert_month_if_absent(row.year, month, share)
                    .await?
                {
                    report.months_created += 1;
                    touched = true;
                } else {
                    report.months_skipped += 1;
                }
            }

            if touched {
                self.cache.invalidate_overlapping(&period);
            }
        }

        info!(
            quarters_scanned = report.quarters_scanned,
            months_created = report.months_created,
            months_skipped = report.months_skipped,
            "Legacy quarterly deductions migrated"
        );
        Ok(report)
    }
}
