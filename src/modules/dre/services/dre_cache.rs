use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::core::{ExpiringCache, Period, PeriodSignature};
use crate::modules::dre::models::DreData;

/// Computed DRE reports keyed by period signature.
///
/// Every invalidation bumps a generation counter. A report computed from
/// reads that started before an invalidation is refused by
/// [`DreCache::put_if_current`], so a write racing a slow report can never
/// leave the old figures cached.
#[derive(Debug)]
pub struct DreCache {
    entries: ExpiringCache<PeriodSignature, DreData>,
    generation: AtomicU64,
}

impl DreCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: ExpiringCache::new(ttl),
            generation: AtomicU64::new(0),
        }
    }

    /// Current invalidation generation; capture it before reading the data a
    /// report is built from
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn get(&self, period: &Period) -> Option<DreData> {
        self.entries.get(&period.signature())
    }

    pub fn put(&self, period: &Period, report: DreData) {
        self.entries.insert(period.signature(), report);
    }

    /// Caches `report` only if no invalidation happened since `generation`
    /// was captured. Returns whether the report was kept.
    pub fn put_if_current(&self, period: &Period, generation: u64, report: DreData) -> bool {
        if self.generation() != generation {
            return false;
        }

        let signature = period.signature();
        self.entries.insert(signature, report);

        // An invalidation may have slipped in between the check and the insert
        if self.generation() != generation {
            self.entries.invalidate(&signature);
            return false;
        }
        true
    }

    /// Drops the cached report of every period that shares a month with
    /// `written`: the period itself, the months inside it, and the quarter and
    /// year around it. Returns how many entries were removed.
    pub fn invalidate_overlapping(&self, written: &Period) -> usize {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let removed = written
            .overlapping_periods()
            .iter()
            .filter(|period| self.entries.invalidate(&period.signature()))
            .count();

        tracing::debug!(period = %written, removed, "DRE cache invalidated");
        removed
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
