//! Errors - エラー型と分類
//!
//! # 分類
//! - RecordParseError: 録画の 1 レコードが壊れている（skip して続行）
//! - UnsupportedKind: builder が扱えない kind（別バケットで集計）
//! - TransportError: transport 呼び出し自体が fault した（exceptioned で集計）
//! - ReplayError: 録画自体が読めない等、dispatch 前に中断すべきもの
//!
//! 非 2xx などの「返ってきたが失敗」はエラー型ではなく
//! `TransportResponse` として表現します。

use super::kind::RequestKind;

/// The builder has no request shape for this kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported request kind '{0}'")]
pub struct UnsupportedKind(pub RequestKind);

/// A single recording entry could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("record #{index} is malformed: {reason}")]
pub struct RecordParseError {
    pub index: usize,
    pub reason: String,
}

impl RecordParseError {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

/// The transport call faulted instead of producing a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors that abort a run before any dispatch begins.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("recording could not be read: {0}")]
    RecordingUnavailable(#[from] std::io::Error),

    #[error("recording is not an array of string records: {0}")]
    MalformedRecording(#[from] serde_json::Error),

    #[error("recording contains no records")]
    EmptyRecording,

    #[error("none of the {0} records in the recording could be decoded")]
    NoUsableRecords(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("transport setup failed: {0}")]
    TransportSetup(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file could not be read: {0}")]
    Read(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be greater than zero")]
    MustBePositive { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_kind_names_the_tag() {
        let err = UnsupportedKind(RequestKind::Unknown("TotallyUnknownType".to_string()));
        assert_eq!(err.to_string(), "unsupported request kind 'TotallyUnknownType'");
    }

    #[test]
    fn record_parse_error_mentions_index() {
        let err = RecordParseError::new(7, "missing field `target`");
        assert!(err.to_string().contains("#7"));
        assert!(err.to_string().contains("target"));
    }
}
