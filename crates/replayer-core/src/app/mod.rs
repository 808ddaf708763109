//! App - アプリケーション層
//!
//! domain と ports を組み合わせて replay engine を構成します。
//!
//! # 主要コンポーネント
//! - **loader**: 録画ドキュメント → Batch
//! - **RequestBuilder**: Envelope → TransportRequest
//! - **Dispatcher**: 1 round 分の bounded-concurrency 実行
//! - **Aggregator**: 結果カウンタ（run 全体で累積）
//! - **Replayer**: round を順番に回してレポートを作る

pub mod aggregator;
pub mod dispatcher;
pub mod loader;
pub mod replayer;
pub mod request_builder;

pub use self::aggregator::{Aggregator, KindCensus, OutcomeCounts};
pub use self::dispatcher::{Dispatcher, RoundSummary};
pub use self::loader::{LoadedRecording, decode_recording, load};
pub use self::replayer::{ReplayReport, Replayer};
pub use self::request_builder::RequestBuilder;
