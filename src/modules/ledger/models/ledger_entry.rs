use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{money, AppError, Result};

/// Income statement line a ledger entry is booked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    RevenueOperations,
    RevenueOther,
    CostFator,
    CostAdValorem,
    CostIof,
    Expense,
    TaxPis,
    TaxCofins,
    TaxIssqn,
}

impl EntryCategory {
    pub const ALL: [EntryCategory; 9] = [
        EntryCategory::RevenueOperations,
        EntryCategory::RevenueOther,
        EntryCategory::CostFator,
        EntryCategory::CostAdValorem,
        EntryCategory::CostIof,
        EntryCategory::Expense,
        EntryCategory::TaxPis,
        EntryCategory::TaxCofins,
        EntryCategory::TaxIssqn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryCategory::RevenueOperations => "revenue_operations",
            EntryCategory::RevenueOther => "revenue_other",
            EntryCategory::CostFator => "cost_fator",
            EntryCategory::CostAdValorem => "cost_ad_valorem",
            EntryCategory::CostIof => "cost_iof",
            EntryCategory::Expense => "expense",
            EntryCategory::TaxPis => "tax_pis",
            EntryCategory::TaxCofins => "tax_cofins",
            EntryCategory::TaxIssqn => "tax_issqn",
        }
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        EntryCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown entry category: {}", s)))
    }
}

/// A revenue, cost, expense or tax amount booked on a competence date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub category: EntryCategory,
    pub description: String,
    pub amount: Decimal,
    pub competence_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Database row; category is stored as its snake_case name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LedgerEntryRow {
    pub id: String,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub competence_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = AppError;

    fn try_from(row: LedgerEntryRow) -> Result<Self> {
        Ok(LedgerEntry {
            id: row.id,
            category: row
                .category
                .parse()
                .map_err(|_| AppError::internal(format!("Corrupt ledger category '{}'", row.category)))?,
            description: row.description,
            amount: row.amount,
            competence_date: row.competence_date,
            created_at: row.created_at,
        })
    }
}

/// Payload for booking a new entry
#[derive(Debug, Clone, Deserialize)]
pub struct NewLedgerEntry {
    pub category: EntryCategory,
    pub description: String,
    pub amount: Decimal,
    pub competence_date: NaiveDate,
}

impl NewLedgerEntry {
    pub const MAX_DESCRIPTION_LEN: usize = 255;

    pub fn validate(&self) -> Result<()> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(AppError::validation("description cannot be empty"));
        }
        if description.chars().count() > Self::MAX_DESCRIPTION_LEN {
            return Err(AppError::validation(format!(
                "description cannot exceed {} characters",
                Self::MAX_DESCRIPTION_LEN
            )));
        }
        money::validate_amount("amount", self.amount).map_err(AppError::Validation)
    }
}

/// Sum of amounts booked against one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: EntryCategory,
    pub total: Decimal,
}
