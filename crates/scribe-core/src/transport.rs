use async_trait::async_trait;
use serde_json::Value;

/// Error reported by the dispatch layer itself, before any response body
/// can be interpreted.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("endpoint {0} is unreachable")]
    Unreachable(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("document store returned error code {0}")]
    ErrorCode(i32),
}

/// Request/response boundary of the remote document store.
///
/// Implementations deliver the JSON request body to the named endpoint and
/// eventually produce either the JSON response body or a transport error
/// with an unspecified body. Addressing, timeouts, and cancellation are the
/// implementation's concern.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value, TransportError>;
}
