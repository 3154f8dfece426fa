//! Validation capability consumed by the credential gate.
use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Reason a validator refused a bearer token.
///
/// The gate logs this value but never puts it in a response body.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("token rejected: {0}")]
    Rejected(String),

    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("missing or empty claim: {0}")]
    EmptyClaim(&'static str),

    #[error("validation cancelled")]
    Cancelled,
}

impl ValidationError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Asserts that a raw bearer token is acceptable (authentic, unexpired, not revoked...).
///
/// `scope` is cancelled when the request that triggered the call goes away
/// (client disconnect, request timeout). Implementations doing remote or
/// otherwise slow work should stop when it fires; the gate itself stops
/// waiting as soon as it does.
///
/// Implementations are shared by every in-flight request and must be safe
/// for concurrent use.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, scope: &CancellationToken, token: &str)
    -> Result<(), ValidationError>;
}
