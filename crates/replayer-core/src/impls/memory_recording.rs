//! MemoryRecording - メモリ上の文字列を録画として扱う（埋め込みリソース・テスト用）

use async_trait::async_trait;

use crate::domain::ReplayError;
use crate::ports::RecordingSource;

pub struct MemoryRecording {
    name: String,
    document: String,
}

impl MemoryRecording {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
        }
    }
}

#[async_trait]
impl RecordingSource for MemoryRecording {
    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }

    async fn read(&self) -> Result<String, ReplayError> {
        Ok(self.document.clone())
    }
}
