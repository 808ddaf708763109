//! Dispatcher - 1 round 分の bounded-concurrency 実行
//!
//! # フロー（unit = envelope 1 件）
//! 1. gate（Semaphore）の permit を待つ（キャンセルと競合させる）
//! 2. permit 取得直後にキャンセルを確認
//! 3. RequestBuilder で TransportRequest を組み立て
//! 4. Transport で実行（キャンセルと競合させる）
//! 5. Outcome に分類して Aggregator に記録
//! 6. permit は drop で必ず返却（panic 時も）
//!
//! # 設計原則
//! - spawn する unit 数に上限はない（上限は gate を通過して実行中の数のみ）
//! - 1 unit の失敗は兄弟 unit や round を止めない
//! - 途中で止める手段は外部からのキャンセルのみ
//! - Dispatcher は round ごとに作り直す（gate もトークンも round 単位）

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::aggregator::{Aggregator, OutcomeCounts};
use super::request_builder::RequestBuilder;
use crate::domain::{Batch, Outcome, OutcomeKind};
use crate::ports::Transport;

/// What one round did, derived from the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub envelopes: usize,
    pub counts: OutcomeCounts,
    /// At least one unit was cut short by cancellation.
    pub cancelled: bool,
    pub elapsed: Duration,
}

pub struct Dispatcher {
    gate: Arc<Semaphore>,
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    aggregator: Arc<Aggregator>,
}

impl Dispatcher {
    /// `concurrency_limit` must be positive; a zero-capacity gate would never
    /// let anything through.
    pub fn new(
        concurrency_limit: usize,
        transport: Arc<dyn Transport>,
        aggregator: Arc<Aggregator>,
    ) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(concurrency_limit)),
            builder: RequestBuilder::new(),
            transport,
            aggregator,
        }
    }

    /// Replay every envelope of `batch` once and wait for all units to finish.
    ///
    /// Returns early (without waiting for in-flight transport calls) only when
    /// `cancel` fires: pending units drop out of the gate and in-flight calls
    /// are abandoned.
    pub async fn run(self, batch: &Batch, cancel: CancellationToken) -> RoundSummary {
        let started = Instant::now();
        let before = self.aggregator.snapshot();
        let span = tracing::Span::current();

        let mut units = JoinSet::new();
        for index in 0..batch.len() {
            let unit = Unit {
                index,
                batch: batch.clone(),
                gate: Arc::clone(&self.gate),
                builder: self.builder,
                transport: Arc::clone(&self.transport),
                aggregator: Arc::clone(&self.aggregator),
                cancel: cancel.clone(),
            };
            units.spawn(unit.run().instrument(span.clone()));
        }

        while let Some(joined) = units.join_next().await {
            if let Err(err) = joined {
                // The unit never reached `record`; count it here so every
                // envelope lands in exactly one bucket.
                tracing::error!(error = %err, "replay unit aborted abnormally");
                self.aggregator
                    .record(&Outcome::exceptioned(format!("unit aborted: {err}")));
            }
        }

        let counts = self.aggregator.snapshot().saturating_sub(&before);
        RoundSummary {
            envelopes: batch.len(),
            cancelled: counts.cancelled > 0,
            counts,
            elapsed: started.elapsed(),
        }
    }
}

/// One logical unit of work: a single envelope in a single round.
struct Unit {
    index: usize,
    batch: Batch,
    gate: Arc<Semaphore>,
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    aggregator: Arc<Aggregator>,
    cancel: CancellationToken,
}

impl Unit {
    async fn run(self) {
        let outcome = self.execute().await;
        self.aggregator.record(&outcome);
    }

    async fn execute(&self) -> Outcome {
        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            permit = Arc::clone(&self.gate).acquire_owned() => permit.ok(),
        };
        // Held until this function returns; dropping releases the slot.
        let Some(_permit) = permit else {
            return Outcome::cancelled();
        };
        if self.cancel.is_cancelled() {
            return Outcome::cancelled();
        }

        let Some(envelope) = self.batch.get(self.index) else {
            return Outcome::exceptioned(format!("no envelope at index {}", self.index));
        };

        let request = match self.builder.build(envelope) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(index = self.index, kind = %err.0, "unsupported request kind");
                return Outcome::unsupported(&err);
            }
        };

        let method = request.method;
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.transport.execute(request) => Some(result),
        };
        let Some(result) = result else {
            tracing::debug!(index = self.index, url = envelope.target(), "in-flight request abandoned");
            return Outcome::cancelled();
        };

        let outcome = Outcome::classify(&result);
        match outcome.kind {
            OutcomeKind::Completed => {
                tracing::debug!(index = self.index, %method, url = envelope.target(), "completed");
            }
            OutcomeKind::Failed => {
                tracing::warn!(
                    index = self.index,
                    %method,
                    url = envelope.target(),
                    error = outcome.reason.as_deref().unwrap_or_default(),
                    "request failed"
                );
            }
            OutcomeKind::Exceptioned => {
                tracing::error!(
                    index = self.index,
                    %method,
                    url = envelope.target(),
                    error = outcome.reason.as_deref().unwrap_or_default(),
                    "transport fault"
                );
            }
            OutcomeKind::Unsupported | OutcomeKind::Cancelled => {}
        }
        outcome
    }
}
