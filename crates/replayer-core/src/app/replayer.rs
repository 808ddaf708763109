//! Replayer - round を順番に回して最終レポートを作る
//!
//! # フロー
//! 1. Batch から census を取り、Aggregator を作る（run 全体で共有）
//! 2. round ごとに新しい Dispatcher と子トークンを作って実行
//! 3. round N+1 は round N の完了後にのみ始まる
//! 4. shutdown トークンが発火したら残りの round は実行しない
//! 5. 全 round 終了後に Aggregator から ReplayReport を組み立てる

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::aggregator::{Aggregator, KindCensus, OutcomeCounts};
use super::dispatcher::{Dispatcher, RoundSummary};
use super::loader::LoadedRecording;
use crate::config::ReplayConfig;
use crate::domain::{Batch, ReplayError, RunId};
use crate::ports::{Clock, IdGenerator, SystemClock, Transport, UlidGenerator};

/// Final totals for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub envelopes: usize,
    pub skipped_records: usize,
    pub rounds_requested: u32,
    pub rounds_finished: u32,
    pub cancelled: bool,

    #[serde(flatten)]
    pub counts: OutcomeCounts,

    /// Static per-kind census of the recording.
    pub kinds: KindCensus,
}

pub struct Replayer {
    config: ReplayConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Replayer {
    pub fn new(config: ReplayConfig, transport: Arc<dyn Transport>) -> Result<Self, ReplayError> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UlidGenerator::new(SystemClock)),
        })
    }

    pub fn with_clock<C: Clock + Clone + 'static>(mut self, clock: C) -> Self {
        self.ids = Arc::new(UlidGenerator::new(clock.clone()));
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay `recording` for the configured number of rounds.
    ///
    /// Cancelling `shutdown` cancels the current round and skips the rest.
    pub async fn run(&self, recording: LoadedRecording, shutdown: CancellationToken) -> ReplayReport {
        let LoadedRecording { batch, skipped } = recording;
        let run_id = self.ids.generate_run_id();
        let started_at = self.clock.now();
        let aggregator = Arc::new(Aggregator::new(KindCensus::scan(&batch)));

        tracing::info!(
            %run_id,
            envelopes = batch.len(),
            rounds = self.config.rounds,
            concurrency_limit = self.config.concurrency_limit,
            "replay started"
        );

        let mut rounds_finished = 0;
        for round in 1..=self.config.rounds {
            if shutdown.is_cancelled() {
                tracing::info!(%run_id, round, "shutdown requested, skipping remaining rounds");
                break;
            }

            let summary = self
                .run_round(run_id, round, &batch, Arc::clone(&aggregator), shutdown.child_token())
                .await;
            if summary.cancelled {
                break;
            }
            rounds_finished += 1;
        }

        let report = ReplayReport {
            run_id,
            started_at,
            finished_at: self.clock.now(),
            envelopes: batch.len(),
            skipped_records: skipped.len(),
            rounds_requested: self.config.rounds,
            rounds_finished,
            cancelled: rounds_finished < self.config.rounds,
            counts: aggregator.snapshot(),
            kinds: aggregator.census().clone(),
        };

        tracing::info!(
            %run_id,
            completed = report.counts.completed,
            failed = report.counts.failed,
            exceptioned = report.counts.exceptioned,
            unsupported = report.counts.unsupported,
            cancelled = report.counts.cancelled,
            "replay finished"
        );
        for (kind, count) in report.kinds.iter() {
            tracing::info!(%run_id, kind, count, "recorded kind");
        }

        report
    }

    async fn run_round(
        &self,
        run_id: RunId,
        round: u32,
        batch: &Batch,
        aggregator: Arc<Aggregator>,
        cancel: CancellationToken,
    ) -> RoundSummary {
        let round_id = self.ids.generate_round_id();
        let span = tracing::info_span!("round", %run_id, %round_id, round);

        async {
            let dispatcher = Dispatcher::new(
                self.config.concurrency_limit,
                Arc::clone(&self.transport),
                aggregator,
            );
            let summary = dispatcher.run(batch, cancel).await;
            tracing::info!(
                completed = summary.counts.completed,
                failed = summary.counts.failed,
                exceptioned = summary.counts.exceptioned,
                unsupported = summary.counts.unsupported,
                cancelled = summary.counts.cancelled,
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "round finished"
            );
            summary
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dispatcher::tests::{HangingTransport, OkTransport, batch_of, gets};
    use crate::domain::{RequestKind, TransportError, TransportRequest, TransportResponse};
    use crate::ports::{FixedClock, Transport};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn loaded(batch: Batch) -> LoadedRecording {
        LoadedRecording {
            batch,
            skipped: Vec::new(),
        }
    }

    fn config(concurrency_limit: usize, rounds: u32) -> ReplayConfig {
        ReplayConfig {
            concurrency_limit,
            rounds,
            ..ReplayConfig::default()
        }
    }

    #[tokio::test]
    async fn totals_are_cumulative_across_rounds() {
        let transport = Arc::new(OkTransport::default());
        let replayer = Replayer::new(config(4, 3), transport.clone()).unwrap();

        let report = replayer.run(loaded(gets(7)), CancellationToken::new()).await;

        assert_eq!(report.counts.completed, 21);
        assert_eq!(report.counts.failed, 0);
        assert_eq!(report.counts.exceptioned, 0);
        assert_eq!(report.rounds_finished, 3);
        assert!(!report.cancelled);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 21);
    }

    #[tokio::test]
    async fn census_is_static_not_per_round() {
        let batch = batch_of(&[
            RequestKind::Get,
            RequestKind::Patch,
            RequestKind::Unknown("Odd".to_string()),
        ]);
        let replayer = Replayer::new(config(2, 2), Arc::new(OkTransport::default())).unwrap();

        let report = replayer.run(loaded(batch), CancellationToken::new()).await;

        assert_eq!(report.kinds.get("GET"), 1);
        assert_eq!(report.kinds.get("PATCH"), 1);
        assert_eq!(report.kinds.get("Odd"), 1);
        assert_eq!(report.counts.completed, 2);
        assert_eq!(report.counts.unsupported, 4);
    }

    #[tokio::test]
    async fn shutdown_stops_remaining_rounds() {
        let replayer = Replayer::new(config(2, 5), Arc::new(HangingTransport)).unwrap();
        let shutdown = CancellationToken::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            replayer.run(loaded(gets(6)), shutdown),
        )
        .await
        .expect("run must return after shutdown");

        assert!(report.cancelled);
        assert_eq!(report.rounds_finished, 0);
        assert_eq!(report.counts.cancelled, 6);
        assert_eq!(report.counts.processed(), 0);
    }

    /// Fires `shutdown` from inside the call and still answers 200.
    struct CancelsOnCall(CancellationToken);

    #[async_trait]
    impl Transport for CancelsOnCall {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.0.cancel();
            Ok(TransportResponse::with_status(200))
        }
    }

    #[tokio::test]
    async fn shutdown_after_the_last_unit_does_not_mark_the_run_cancelled() {
        let shutdown = CancellationToken::new();
        let transport = Arc::new(CancelsOnCall(shutdown.clone()));
        let replayer = Replayer::new(config(1, 1), transport).unwrap();

        let report = replayer.run(loaded(gets(1)), shutdown.clone()).await;

        assert!(shutdown.is_cancelled());
        assert_eq!(report.counts.completed, 1);
        assert_eq!(report.counts.cancelled, 0);
        assert_eq!(report.rounds_finished, 1);
        assert!(!report.cancelled);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let result = Replayer::new(config(0, 1), Arc::new(OkTransport::default()));
        assert!(matches!(result, Err(ReplayError::Config(_))));
    }

    #[tokio::test]
    async fn report_uses_the_injected_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let replayer = Replayer::new(config(1, 1), Arc::new(OkTransport::default()))
            .unwrap()
            .with_clock(FixedClock::new(at));

        let report = replayer.run(loaded(gets(1)), CancellationToken::new()).await;

        assert_eq!(report.started_at, at);
        assert_eq!(report.finished_at, at);
        assert_eq!(report.run_id.as_ulid().timestamp_ms(), at.timestamp_millis() as u64);
    }

    #[tokio::test]
    async fn report_serializes_flat_counts() {
        let replayer = Replayer::new(config(1, 1), Arc::new(OkTransport::default())).unwrap();
        let report = replayer.run(loaded(gets(2)), CancellationToken::new()).await;

        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["completed"], 2);
        assert_eq!(v["kinds"]["GET"], 2);
        assert_eq!(v["rounds_finished"], 1);
    }
}
