//! Unified error handling for the console.

use thiserror::Error;
use vendor_desk_core::listing::BulkActionError;
use vendor_desk_core::types::ValidationError;

use crate::config::ConfigError;
use crate::editor::EditorError;
use crate::gateway::GatewayError;
use crate::profile::ProfileStoreError;

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vendor API call failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Draft failed client-side validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Form state machine refused the operation.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Unknown bulk action key.
    #[error("Bulk action error: {0}")]
    BulkAction(#[from] BulkActionError),

    /// Local profile mirror could not be read or written.
    #[error("Profile store error: {0}")]
    ProfileStore(#[from] ProfileStoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ConsoleError {
    /// The message shown to the vendor.
    ///
    /// Server and transport details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) | Self::Editor(EditorError::Remote(err)) => gateway_message(err),
            Self::Validation(err) | Self::Editor(EditorError::Validation(err)) => err.to_string(),
            Self::Editor(err) => err.to_string(),
            Self::BulkAction(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Config(_) => "The console is not configured correctly".to_string(),
            Self::ProfileStore(_) => "Could not save your store profile locally".to_string(),
        }
    }

    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Gateway(err) | Self::Editor(EditorError::Remote(err)) => err.is_server_side(),
            Self::ProfileStore(_) => true,
            _ => false,
        }
    }

    /// Log the error and, for server-side failures, send it to Sentry.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console error"
            );
        } else {
            tracing::warn!(error = %self, "Console error");
        }
    }
}

fn gateway_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Status { status: 401 | 403, .. } => {
            "Your session is not authorized for this action".to_string()
        }
        GatewayError::Status { status: 404, .. } => "The record no longer exists".to_string(),
        GatewayError::Status { status, message } if *status < 500 && !message.is_empty() => {
            message.clone()
        }
        GatewayError::Rejected(message) if !message.is_empty() => message.clone(),
        GatewayError::Timeout(_) => "The server took too long to respond. Please try again".to_string(),
        GatewayError::Status { .. }
        | GatewayError::Request(_)
        | GatewayError::Decode(_)
        | GatewayError::Rejected(_) => "Something went wrong. Please try again".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_console_error_display() {
        let err = ConsoleError::NotFound("order 1001".to_string());
        assert_eq!(err.to_string(), "Not found: order 1001");
        assert_eq!(err.user_message(), "order 1001 was not found");
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = ConsoleError::from(GatewayError::Status {
            status: 500,
            message: "SQLSTATE[42S02] table missing".to_string(),
        });
        assert_eq!(err.user_message(), "Something went wrong. Please try again");
        assert!(err.is_reportable());
    }

    #[test]
    fn test_user_message_passes_client_errors() {
        let err = ConsoleError::from(GatewayError::Status {
            status: 422,
            message: "Coupon code already exists".to_string(),
        });
        assert_eq!(err.user_message(), "Coupon code already exists");
        assert!(!err.is_reportable());

        let err = ConsoleError::from(EditorError::Remote(GatewayError::Rejected(
            "Zone name taken".to_string(),
        )));
        assert_eq!(err.user_message(), "Zone name taken");
    }

    #[test]
    fn test_user_message_for_validation_and_timeout() {
        let err = ConsoleError::from(EditorError::Validation(ValidationError::Required {
            field: "country",
        }));
        assert_eq!(err.user_message(), "country is required");

        let err = ConsoleError::from(GatewayError::Timeout(Duration::from_secs(30)));
        assert!(err.user_message().contains("too long"));
        assert!(err.is_reportable());
    }
}
