//! FileRecording - ファイルから録画ドキュメントを読む RecordingSource

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ReplayError;
use crate::ports::RecordingSource;

pub struct FileRecording {
    path: PathBuf,
}

impl FileRecording {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordingSource for FileRecording {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<String, ReplayError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
