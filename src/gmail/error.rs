use thiserror::Error;

/// Classified failures at the provider boundary.
///
/// Variants carry rendered context instead of source errors so results can be
/// cloned into aggregated reports and scripted by test doubles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Credentials invalid or expired. Fatal to the whole operation.
    #[error("authentication rejected: {0}")]
    Auth(String),
    /// Network failure, rate limit or 5xx. Aborts the current page or batch;
    /// accumulated progress must be preserved by the caller.
    #[error("transient provider failure: {0}")]
    Transient(String),
    /// Message already deleted or moved. Expected during bulk operations.
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-retryable refusal.
    #[error("request rejected by provider: {0}")]
    Rejected(String),
}

impl ProviderError {
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 | 403 => Self::Auth(detail),
            404 => Self::NotFound(detail),
            429 | 500..=599 => Self::Transient(detail),
            _ => Self::Rejected(detail),
        }
    }

    /// Whether the error invalidates the whole operation, not just one call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
