//! Transport port - built request を実際に実行する能力
//!
//! Transport は `TransportRequest` を受け取り、
//! 返ってきた結果（`TransportResponse`）か fault（`TransportError`）を返します。
//!
//! # 設計原則
//! - 分類（completed / failed / exceptioned）は呼び出し側の責務
//! - 非 2xx は Err ではなく Ok(TransportResponse) で返す
//! - future が drop されたら in-flight の呼び出しは中断してよい（best-effort）

use async_trait::async_trait;

use crate::domain::{TransportError, TransportRequest, TransportResponse};

/// Performs one built request.
///
/// # Thread Safety
/// - `Send + Sync` を要求（全 unit から `Arc<dyn Transport>` で共有される）
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest)
    -> Result<TransportResponse, TransportError>;
}
