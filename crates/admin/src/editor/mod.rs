//! Optimistic create/edit/delete for entity collections.
//!
//! One generic state machine serves every settings screen:
//!
//! ```text
//! Idle -> Editing -> Submitting -> Idle      (remote call succeeded)
//!                               -> Editing   (remote call failed, rolled back)
//! Idle -> Submitting (delete)   -> Idle
//! ```
//!
//! A failed remote call restores the exact pre-submit collection and raises
//! an error banner that hides itself after the configured window.

mod collection;
mod controller;
mod flash;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use vendor_desk_core::types::ValidationError;

use crate::error::ConsoleError;
use crate::gateway::GatewayError;

pub use collection::{Mutation, OptimisticCollection, PendingMutation};
pub use controller::{DeleteTicket, EditorController, EditorState, SubmitRequest, SubmitTicket};
pub use flash::{Flash, FlashLevel, FlashSlot};

/// Timing knobs shared by every editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Upper bound on a single remote call.
    pub request_timeout: Duration,
    /// How long an error banner stays visible.
    pub flash_window: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            flash_window: Duration::from_secs(3),
        }
    }
}

/// Errors from the editor state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Draft failed client-side validation; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    /// No form is open.
    #[error("Nothing is being edited")]
    NotEditing,

    /// An update was attempted on a draft without an id.
    #[error("Entity has no id")]
    MissingId,

    /// The target entity is not in the collection.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// The remote call failed; the collection was rolled back.
    #[error(transparent)]
    Remote(#[from] GatewayError),
}

/// Await `call`, giving up after `limit`.
///
/// # Errors
///
/// Returns [`GatewayError::Timeout`] when `limit` elapses first, otherwise
/// whatever `call` returned.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(GatewayError::Timeout(limit)))
}

/// Log a failed remote call and show it in `flash`.
pub(crate) fn raise_remote_error(flash: &mut FlashSlot, err: &GatewayError) {
    tracing::warn!(error = %err, "Remote call failed");
    let err = ConsoleError::from(err.clone());
    err.report();
    flash.raise(FlashLevel::Error, err.user_message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, GatewayError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_with_timeout_gives_up() {
        let limit = Duration::from_millis(20);
        let result: Result<(), _> = with_timeout(limit, std::future::pending()).await;
        assert_eq!(result, Err(GatewayError::Timeout(limit)));
    }

    #[test]
    fn test_editor_error_display() {
        let err = EditorError::from(ValidationError::Required { field: "name" });
        assert_eq!(err.to_string(), "name is required");
        assert_eq!(
            EditorError::AlreadySubmitting.to_string(),
            "A submission is already in progress"
        );
    }
}
