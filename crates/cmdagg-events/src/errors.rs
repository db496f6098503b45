//! Error handling for cmdagg-events
//!
//! Wraps cmdagg-core ExError with event-bus-specific helpers

use cmdagg_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a duplicate subscription error
pub fn duplicate_registration(event_type: &str, subscriber: &str) -> ExError {
    ExError::new(ExErrorKind::DuplicateRegistration)
        .with_op("event_subscribe")
        .with_message(format!(
            "Event {} is already registered for subscriber {}",
            event_type, subscriber
        ))
}

/// Create an invalid subscriber error
pub fn invalid_subscriber(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidArgument)
        .with_op("event_subscribe")
        .with_message(reason.to_string())
}

/// Create an internal error for a handler stored under the wrong type
pub fn handler_type_mismatch(event_type: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("event_publish")
        .with_message(format!("Handler stored for {} has an unexpected type", event_type))
}
