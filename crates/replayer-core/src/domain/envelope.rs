//! Envelope - 録画された request 1 件分の記述
//!
//! Envelope は request を再構築するのに必要な情報をすべて持ちます。
//! 録画フォーマット上のフィールド名は camelCase です。
//!
//! # フィールド
//! - kind: RequestKind（どの種類の request か）
//! - target: URL
//! - common_args: 全種類共通のメタデータ（attempts / timeout は参考値）
//! - type_args: 種類ごとの引数（body, content-type, form, audio type）
//! - was_cancelled_at_capture: 録画時にキャンセルされたか（参考値）
//! - headers: 録画時の生ヘッダ文字列

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::kind::RequestKind;

/// One recorded request.
///
/// Immutable after load: fields are private and only exposed by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    kind: RequestKind,
    target: String,

    #[serde(default)]
    common_args: CommonArgs,

    #[serde(default)]
    type_args: TypeArgs,

    #[serde(default)]
    was_cancelled_at_capture: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    headers: Option<String>,
}

impl Envelope {
    pub fn new(kind: RequestKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            common_args: CommonArgs::default(),
            type_args: TypeArgs::default(),
            was_cancelled_at_capture: false,
            headers: None,
        }
    }

    pub fn with_common_args(mut self, common_args: CommonArgs) -> Self {
        self.common_args = common_args;
        self
    }

    pub fn with_type_args(mut self, type_args: TypeArgs) -> Self {
        self.type_args = type_args;
        self
    }

    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    pub fn with_cancelled_at_capture(mut self, cancelled: bool) -> Self {
        self.was_cancelled_at_capture = cancelled;
        self
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn common_args(&self) -> &CommonArgs {
        &self.common_args
    }

    pub fn type_args(&self) -> &TypeArgs {
        &self.type_args
    }

    pub fn was_cancelled_at_capture(&self) -> bool {
        self.was_cancelled_at_capture
    }

    pub fn headers(&self) -> Option<&str> {
        self.headers.as_deref()
    }
}

/// Metadata shared by every kind.
///
/// `attempts_count` and `timeout_seconds` are carried from the recording but
/// never acted upon: no retry, no per-request deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonArgs {
    pub attempts_count: u32,
    pub timeout_seconds: u32,

    /// Opaque reference to a capture-side download handler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_download_handler: Option<String>,
}

/// Kind-specific arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<Payload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_data: Option<Payload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub form: Vec<FormSection>,

    /// Audio format selector for `AUDIO_CLIP` (e.g. "WAV", "OGGVORBIS").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_type: Option<String>,
}

/// Request body as recorded: either text or a raw byte array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Text(s) => s.into_bytes(),
            Payload::Bytes(b) => b,
        }
    }
}

/// One section of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub name: String,

    #[serde(default)]
    pub data: Payload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Text(String::new())
    }
}

/// The ordered set of envelopes loaded from one recording.
///
/// Cheap to clone (shared slice); replayed verbatim by every round.
#[derive(Debug, Clone)]
pub struct Batch {
    envelopes: Arc<[Envelope]>,
}

impl Batch {
    pub fn new(envelopes: Vec<Envelope>) -> Self {
        Self {
            envelopes: envelopes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Envelope> {
        self.envelopes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.envelopes.iter()
    }
}

impl FromIterator<Envelope> for Batch {
    fn from_iter<I: IntoIterator<Item = Envelope>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
