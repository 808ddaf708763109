//! replayer-core
//!
//! Replay engine for recorded HTTP traffic: load a recording, rebuild each
//! request, push it through a bounded-concurrency gate, and tally outcomes
//! across one or more rounds.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（envelope, kind, request, outcome, errors, ids）
//! - **ports**: 抽象化レイヤー（Transport, RecordingSource, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（loader, request_builder, dispatcher, aggregator, replayer）
//! - **impls**: 実装（HttpTransport, FileRecording, MemoryRecording）
//! - **config**: 実行設定（ReplayConfig）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{ReplayReport, Replayer};
pub use config::ReplayConfig;
