//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpTransport**: reqwest ベースの Transport
//! - **FileRecording**: ファイルから録画を読む
//! - **MemoryRecording**: 文字列をそのまま録画として使う（埋め込み・テスト用）

pub mod file_recording;
pub mod http_transport;
pub mod memory_recording;

pub use self::file_recording::FileRecording;
pub use self::http_transport::HttpTransport;
pub use self::memory_recording::MemoryRecording;
