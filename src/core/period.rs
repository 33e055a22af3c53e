//! Reporting periods (month, quarter, year) and their cache signatures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::core::{AppError, Result};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// Granularity of a reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Quarterly,
    Annual,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodType::Monthly => write!(f, "monthly"),
            PeriodType::Quarterly => write!(f, "quarterly"),
            PeriodType::Annual => write!(f, "annual"),
        }
    }
}

/// A reporting window. Month and quarter only exist on the variants that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PeriodParts", try_from = "PeriodParts")]
pub enum Period {
    Monthly { year: i32, month: u32 },
    Quarterly { year: i32, quarter: u32 },
    Annual { year: i32 },
}

/// Flat wire form of a period, as sent in query strings and JSON bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodParts {
    pub period_type: PeriodType,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u32>,
}

/// Cache key of a period: `(period_type, year, quarter ?? month ?? 0)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodSignature {
    pub period_type: PeriodType,
    pub year: i32,
    pub index: u32,
}

impl fmt::Display for PeriodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.period_type, self.year, self.index)
    }
}

fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::validation(format!(
            "year must be between {} and {}, got {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}

impl Period {
    pub fn monthly(year: i32, month: u32) -> Result<Self> {
        validate_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Period::Monthly { year, month })
    }

    pub fn quarterly(year: i32, quarter: u32) -> Result<Self> {
        validate_year(year)?;
        if !(1..=4).contains(&quarter) {
            return Err(AppError::validation(format!(
                "quarter must be between 1 and 4, got {}",
                quarter
            )));
        }
        Ok(Period::Quarterly { year, quarter })
    }

    pub fn annual(year: i32) -> Result<Self> {
        validate_year(year)?;
        Ok(Period::Annual { year })
    }

    /// Builds a period from its flat form, enforcing that `month` is present
    /// iff monthly and `quarter` iff quarterly.
    pub fn from_parts(
        period_type: PeriodType,
        year: i32,
        month: Option<u32>,
        quarter: Option<u32>,
    ) -> Result<Self> {
        match (period_type, month, quarter) {
            (PeriodType::Monthly, Some(month), None) => Period::monthly(year, month),
            (PeriodType::Quarterly, None, Some(quarter)) => Period::quarterly(year, quarter),
            (PeriodType::Annual, None, None) => Period::annual(year),
            (PeriodType::Monthly, _, _) => Err(AppError::validation(
                "monthly period requires month and no quarter",
            )),
            (PeriodType::Quarterly, _, _) => Err(AppError::validation(
                "quarterly period requires quarter and no month",
            )),
            (PeriodType::Annual, _, _) => Err(AppError::validation(
                "annual period takes neither month nor quarter",
            )),
        }
    }

    /// The quarter (1-4) a calendar month falls in
    pub fn quarter_of_month(month: u32) -> u32 {
        (month.saturating_sub(1)) / 3 + 1
    }

    pub fn year(&self) -> i32 {
        match *self {
            Period::Monthly { year, .. }
            | Period::Quarterly { year, .. }
            | Period::Annual { year } => year,
        }
    }

    pub fn period_type(&self) -> PeriodType {
        match self {
            Period::Monthly { .. } => PeriodType::Monthly,
            Period::Quarterly { .. } => PeriodType::Quarterly,
            Period::Annual { .. } => PeriodType::Annual,
        }
    }

    /// Calendar months covered by this period
    pub fn months(&self) -> RangeInclusive<u32> {
        match *self {
            Period::Monthly { month, .. } => month..=month,
            Period::Quarterly { quarter, .. } => {
                let start = (quarter - 1) * 3 + 1;
                start..=start + 2
            }
            Period::Annual { .. } => 1..=12,
        }
    }

    /// First and last day of the period, both inclusive
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let year = self.year();
        let months = self.months();
        let (first_month, last_month) = (*months.start(), *months.end());

        let start = NaiveDate::from_ymd_opt(year, first_month, 1)
            .ok_or_else(|| AppError::internal(format!("invalid period start {}", self)))?;
        let after_end = if last_month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, last_month + 1, 1)
        };
        let end = after_end
            .and_then(|date| date.pred_opt())
            .ok_or_else(|| AppError::internal(format!("invalid period end {}", self)))?;

        Ok((start, end))
    }

    pub fn signature(&self) -> PeriodSignature {
        let index = match *self {
            Period::Monthly { month, .. } => month,
            Period::Quarterly { quarter, .. } => quarter,
            Period::Annual { .. } => 0,
        };
        PeriodSignature {
            period_type: self.period_type(),
            year: self.year(),
            index,
        }
    }

    /// True if every month of `other` lies inside this period
    pub fn contains(&self, other: &Period) -> bool {
        if self.year() != other.year() {
            return false;
        }
        let mine = self.months();
        let theirs = other.months();
        mine.start() <= theirs.start() && theirs.end() <= mine.end()
    }

    /// True if the two periods share at least one month
    pub fn overlaps(&self, other: &Period) -> bool {
        if self.year() != other.year() {
            return false;
        }
        let mine = self.months();
        let theirs = other.months();
        mine.start() <= theirs.end() && theirs.start() <= mine.end()
    }

    /// The month containing a given date
    pub fn month_of(date: NaiveDate) -> Result<Self> {
        use chrono::Datelike;
        Period::monthly(date.year(), date.month())
    }

    /// Every month, quarter and year of the same calendar year that shares a
    /// month with this period. A write to this period changes all of them.
    pub fn overlapping_periods(&self) -> Vec<Period> {
        let year = self.year();
        let months = (1..=12).map(|month| Period::Monthly { year, month });
        let quarters = (1..=4).map(|quarter| Period::Quarterly { year, quarter });

        months
            .chain(quarters)
            .chain(std::iter::once(Period::Annual { year }))
            .filter(|candidate| candidate.overlaps(self))
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Monthly { year, month } => write!(f, "{}-{:02}", year, month),
            Period::Quarterly { year, quarter } => write!(f, "{}-Q{}", year, quarter),
            Period::Annual { year } => write!(f, "{}", year),
        }
    }
}

impl From<Period> for PeriodParts {
    fn from(period: Period) -> Self {
        let (month, quarter) = match period {
            Period::Monthly { month, .. } => (Some(month), None),
            Period::Quarterly { quarter, .. } => (None, Some(quarter)),
            Period::Annual { .. } => (None, None),
        };
        PeriodParts {
            period_type: period.period_type(),
            year: period.year(),
            month,
            quarter,
        }
    }
}

impl TryFrom<PeriodParts> for Period {
    type Error = AppError;

    fn try_from(parts: PeriodParts) -> Result<Self> {
        Period::from_parts(parts.period_type, parts.year, parts.month, parts.quarter)
    }
}
