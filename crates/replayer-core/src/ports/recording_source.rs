//! RecordingSource port - 録画ドキュメントの供給元
//!
//! ファイル、埋め込みリソース、メモリ上の文字列などを同じように扱うための抽象です。
//! 返すのは外側のドキュメント（文字列レコードの JSON 配列）そのもので、
//! デコードは loader が行います。

use async_trait::async_trait;

use crate::domain::ReplayError;

#[async_trait]
pub trait RecordingSource: Send + Sync {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Read the whole outer document.
    async fn read(&self) -> Result<String, ReplayError>;
}
