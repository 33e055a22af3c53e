use std::sync::Arc;
use tracing::info;

use crate::core::{Period, Result};
use crate::modules::dre::services::DreCache;
use crate::modules::ledger::models::{CategoryTotal, LedgerEntry, NewLedgerEntry};
use crate::modules::ledger::repositories::LedgerStore;

/// Books revenue, cost, expense and tax entries that feed the DRE
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    cache: Arc<DreCache>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn LedgerStore>, cache: Arc<DreCache>) -> Self {
        Self { store, cache }
    }

    /// Validate and persist an entry, then drop cached reports covering its month
    pub async fn create(&self, entry: NewLedgerEntry) -> Result<LedgerEntry> {
        entry.validate()?;
        let month = Period::month_of(entry.competence_date)?;

        let created = self.store.insert(&entry).await?;
        self.cache.invalidate_overlapping(&month);

        info!(
            entry_id = %created.id,
            category = %created.category,
            amount = %created.amount,
            period = %month,
            "Ledger entry booked"
        );
        Ok(created)
    }

    pub async fn list(&self, period: &Period) -> Result<Vec<LedgerEntry>> {
        let (start, end) = period.date_range()?;
        self.store.list(start, end).await
    }

    pub async fn totals(&self, period: &Period) -> Result<Vec<CategoryTotal>> {
        let (start, end) = period.date_range()?;
        self.store.totals(start, end).await
    }
}
