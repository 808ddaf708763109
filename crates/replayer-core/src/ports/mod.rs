//! Ports - 抽象化レイヤー
//!
//! このモジュールは replay engine が外部に依存する箇所を trait として定義します。
//! 各 trait の実装は `impls` にあります。
//!
//! # 外部コラボレータ
//! - Transport: request を実際に送る（reqwest など）
//! - RecordingSource: 録画ドキュメントを供給する
//! - Clock / IdGenerator: 時刻と ID（ログ相関用）

pub mod clock;
pub mod id_generator;
pub mod recording_source;
pub mod transport;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::recording_source::RecordingSource;
pub use self::transport::Transport;
