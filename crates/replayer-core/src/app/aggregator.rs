//! Outcome aggregator: cumulative, concurrency-safe counters.
//!
//! Design:
//! - One `Aggregator` per run, shared by every round (totals are cumulative).
//! - Counters are independent `AtomicU64`s; nothing reads them until the
//!   rounds have joined, so `Relaxed` is enough.
//! - The per-kind census is a static scan of the batch taken once at load
//!   time. It says what the recording contains, not what happened.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::{Batch, Outcome, OutcomeKind};

/// Per-kind envelope counts, keyed by the recorded tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindCensus(BTreeMap<String, u64>);

impl KindCensus {
    pub fn scan(batch: &Batch) -> Self {
        let mut counts = BTreeMap::new();
        for envelope in batch.iter() {
            *counts.entry(envelope.kind().to_string()).or_insert(0) += 1;
        }
        Self(counts)
    }

    pub fn get(&self, tag: &str) -> u64 {
        self.0.get(tag).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Snapshot of the outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub completed: u64,
    pub failed: u64,
    pub exceptioned: u64,
    pub unsupported: u64,
    pub cancelled: u64,
}

impl OutcomeCounts {
    /// Envelopes that were actually processed (everything except cancelled).
    pub fn processed(&self) -> u64 {
        self.completed + self.failed + self.exceptioned + self.unsupported
    }

    pub fn saturating_sub(&self, earlier: &OutcomeCounts) -> OutcomeCounts {
        OutcomeCounts {
            completed: self.completed.saturating_sub(earlier.completed),
            failed: self.failed.saturating_sub(earlier.failed),
            exceptioned: self.exceptioned.saturating_sub(earlier.exceptioned),
            unsupported: self.unsupported.saturating_sub(earlier.unsupported),
            cancelled: self.cancelled.saturating_sub(earlier.cancelled),
        }
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    completed: AtomicU64,
    failed: AtomicU64,
    exceptioned: AtomicU64,
    unsupported: AtomicU64,
    cancelled: AtomicU64,
    census: KindCensus,
}

impl Aggregator {
    pub fn new(census: KindCensus) -> Self {
        Self {
            census,
            ..Self::default()
        }
    }

    /// Count one classified outcome.
    pub fn record(&self, outcome: &Outcome) {
        let counter = match outcome.kind {
            OutcomeKind::Completed => &self.completed,
            OutcomeKind::Failed => &self.failed,
            OutcomeKind::Exceptioned => &self.exceptioned,
            OutcomeKind::Unsupported => &self.unsupported,
            OutcomeKind::Cancelled => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OutcomeCounts {
        OutcomeCounts {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            exceptioned: self.exceptioned.load(Ordering::Relaxed),
            unsupported: self.unsupported.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    pub fn census(&self) -> &KindCensus {
        &self.census
    }
}
