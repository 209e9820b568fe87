//! Error types used by the update channel and its transport.
//!
//! This module defines three error enums:
//!
//! - [`ConnectionError`]: a transport connect attempt failed (recovered by the reconnect policy).
//! - [`DeliveryError`]: a transport send attempt failed (recovered by re-queueing the envelope).
//! - [`UpdateError`]: a producer asked for an envelope that would break the envelope invariants.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging.
//! None of them is fatal to the channel: connection and delivery failures are
//! absorbed internally and surfaced only as notifications.

use std::time::Duration;
use thiserror::Error;

use crate::updates::Priority;

/// # Errors produced by a transport connect attempt.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The transport could not establish a connection.
    #[error("connection refused: {reason}")]
    Refused {
        /// Transport-provided reason.
        reason: String,
    },

    /// The connect attempt did not complete within the configured timeout.
    #[error("connect timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },
}

impl ConnectionError {
    /// Shorthand for [`ConnectionError::Refused`].
    pub fn refused(reason: impl Into<String>) -> Self {
        ConnectionError::Refused {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fieldlink::ConnectionError;
    /// use std::time::Duration;
    ///
    /// let err = ConnectionError::Timeout { timeout: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "connect_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectionError::Refused { .. } => "connect_refused",
            ConnectionError::Timeout { .. } => "connect_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConnectionError::Refused { reason } => format!("refused: {reason}"),
            ConnectionError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }
}

/// # Errors produced by a transport send attempt.
///
/// Delivery errors never reach the producer that submitted the update; the
/// envelope is re-queued and retried later.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The transport refused or failed to move the envelope.
    #[error("delivery rejected: {reason}")]
    Rejected {
        /// Transport-provided reason.
        reason: String,
    },

    /// The send attempt did not complete within the configured timeout.
    #[error("send timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The transport has no live connection.
    #[error("transport not connected")]
    NotConnected,
}

impl DeliveryError {
    /// Shorthand for [`DeliveryError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        DeliveryError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Rejected { .. } => "delivery_rejected",
            DeliveryError::Timeout { .. } => "delivery_timeout",
            DeliveryError::NotConnected => "delivery_not_connected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::Rejected { reason } => format!("rejected: {reason}"),
            DeliveryError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            DeliveryError::NotConnected => "not connected".to_string(),
        }
    }
}

/// # Errors produced while building an envelope.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// Custom update type was empty.
    #[error("update type must not be empty")]
    EmptyKind,

    /// Custom update type collides with a built-in update type.
    #[error("update type {kind:?} is reserved for a typed sender")]
    ReservedKind {
        /// The offending type name.
        kind: String,
    },

    /// Target user id was empty.
    #[error("user id must not be empty")]
    EmptyUserId,

    /// Priority is reserved for a typed sender (`urgent` comes only from error alerts).
    #[error("priority {priority:?} is reserved for a typed sender")]
    ReservedPriority {
        /// The rejected priority.
        priority: Priority,
    },
}

impl UpdateError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            UpdateError::EmptyKind => "update_empty_kind",
            UpdateError::ReservedKind { .. } => "update_reserved_kind",
            UpdateError::EmptyUserId => "update_empty_user",
            UpdateError::ReservedPriority { .. } => "update_reserved_priority",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ConnectionError::refused("x").as_label(), "connect_refused");
        assert_eq!(DeliveryError::rejected("x").as_label(), "delivery_rejected");
        assert_eq!(
            DeliveryError::Timeout {
                timeout: Duration::from_millis(10)
            }
            .as_label(),
            "delivery_timeout"
        );
        assert_eq!(UpdateError::EmptyKind.as_label(), "update_empty_kind");
        assert_eq!(
            UpdateError::ReservedPriority {
                priority: Priority::Urgent
            }
            .as_label(),
            "update_reserved_priority"
        );
    }

    #[test]
    fn messages_carry_details() {
        assert_eq!(ConnectionError::refused("dns").as_message(), "refused: dns");
        assert_eq!(
            DeliveryError::rejected("busy").to_string(),
            "delivery rejected: busy"
        );
        let reserved = UpdateError::ReservedKind {
            kind: "job_status".into(),
        };
        assert!(reserved.to_string().contains("job_status"));
    }
}
