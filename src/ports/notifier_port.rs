//! Operator notification port trait.

use async_trait::async_trait;

use crate::domain::error::TraderError;

/// One-way sink for operator-facing messages.
///
/// Callers treat delivery as fire-and-forget: a failed notification is logged
/// and never fails the operation that produced it.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), TraderError>;
}
