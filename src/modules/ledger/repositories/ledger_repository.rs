use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::ledger::models::{
    CategoryTotal, EntryCategory, LedgerEntry, LedgerEntryRow, NewLedgerEntry,
};

/// Storage and aggregation of ledger entries
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry>;

    /// Entries whose competence date lies in `[start, end]`, newest first
    async fn list(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LedgerEntry>>;

    /// Per-category sums over `[start, end]`; categories without entries are omitted
    async fn totals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>>;
}

pub struct MySqlLedgerRepository {
    pool: MySqlPool,
}

impl MySqlLedgerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for MySqlLedgerRepository {
    async fn insert(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let description = entry.description.trim().to_string();

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (id, category, description, amount, competence_date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(entry.category.as_str())
        .bind(&description)
        .bind(entry.amount)
        .bind(entry.competence_date)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(LedgerEntry {
            id,
            category: entry.category,
            description,
            amount: entry.amount,
            competence_date: entry.competence_date,
            created_at,
        })
    }

    async fn list(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntryRow>(
            r#"
            SELECT id, category, description, amount, competence_date, created_at
            FROM ledger_entries
            WHERE competence_date BETWEEN ? AND ?
            ORDER BY competence_date DESC, created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }

    async fn totals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>> {
        let rows: Vec<(String, Decimal)> = sqlx::query_as(
            r#"
            SELECT category, CAST(COALESCE(SUM(amount), 0) AS DECIMAL(17,2)) AS total
            FROM ledger_entries
            WHERE competence_date BETWEEN ? AND ?
            GROUP BY category
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(category, total)| {
                let category = category.parse::<EntryCategory>().map_err(|_| {
                    AppError::internal(format!("Corrupt ledger category '{}'", category))
                })?;
                Ok(CategoryTotal { category, total })
            })
            .collect()
    }
}

/// Process-local ledger, used by tests and local runs without MySQL
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: DashMap<String, LedgerEntry>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        let stored = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            category: entry.category,
            description: entry.description.trim().to_string(),
            amount: entry.amount,
            competence_date: entry.competence_date,
            created_at: Utc::now(),
        };
        self.entries.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn list(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.competence_date >= start && entry.competence_date <= end)
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            b.competence_date
                .cmp(&a.competence_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(entries)
    }

    async fn totals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>> {
        let entries = self.list(start, end).await?;
        let mut totals = Vec::new();
        for category in EntryCategory::ALL {
            let matching: Vec<&LedgerEntry> =
                entries.iter().filter(|e| e.category == category).collect();
            if matching.is_empty() {
                continue;
            }
            let total = matching
                .iter()
                .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
                .ok_or_else(|| AppError::validation("ledger total overflowed"))?;
            totals.push(CategoryTotal { category, total });
        }
        Ok(totals)
    }
}
