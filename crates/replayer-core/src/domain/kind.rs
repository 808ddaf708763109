//! RequestKind - 録画された request の種類タグ
//!
//! 録画上は文字列タグ（`"GET"`, `"AUDIO_CLIP"` など）で表現されます。
//! 既知のタグは enum の variant に、それ以外は `Unknown` に落とします。
//!
//! # 設計原則
//! - 既知集合は閉じた enum（match の網羅性をコンパイラにチェックさせる）
//! - 未知タグも load・census はできる（実行だけできない）

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind tag of a recorded request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestKind {
    Get,
    Head,
    Post,
    Put,
    /// Image download; decoding belongs to the transport.
    Texture,
    /// Audio download, carries an audio-type selector.
    AudioClip,
    AssetBundle,
    /// Recognised for reporting only; never built.
    Delete,
    /// Recognised for reporting only; never built.
    Patch,
    Unknown(String),
}

impl RequestKind {
    pub fn as_str(&self) -> &str {
        match self {
            RequestKind::Get => "GET",
            RequestKind::Head => "HEAD",
            RequestKind::Post => "POST",
            RequestKind::Put => "PUT",
            RequestKind::Texture => "TEXTURE",
            RequestKind::AudioClip => "AUDIO_CLIP",
            RequestKind::AssetBundle => "ASSET_BUNDLE",
            RequestKind::Delete => "DELETE",
            RequestKind::Patch => "PATCH",
            RequestKind::Unknown(tag) => tag,
        }
    }

    /// Is this one of the recognised tags (buildable or census-only)?
    pub fn is_known(&self) -> bool {
        !matches!(self, RequestKind::Unknown(_))
    }
}

impl From<&str> for RequestKind {
    fn from(tag: &str) -> Self {
        match tag {
            "GET" => RequestKind::Get,
            "HEAD" => RequestKind::Head,
            "POST" => RequestKind::Post,
            "PUT" => RequestKind::Put,
            "TEXTURE" => RequestKind::Texture,
            "AUDIO_CLIP" => RequestKind::AudioClip,
            "ASSET_BUNDLE" => RequestKind::AssetBundle,
            "DELETE" => RequestKind::Delete,
            "PATCH" => RequestKind::Patch,
            other => RequestKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RequestKind {
    fn from(tag: String) -> Self {
        match RequestKind::from(tag.as_str()) {
            RequestKind::Unknown(_) => RequestKind::Unknown(tag),
            known => known,
        }
    }
}

impl From<RequestKind> for String {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
