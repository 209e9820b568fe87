//! # Update classification and priority.
//!
//! [`UpdateKind`] names the channel an envelope belongs to. Built-in kinds map
//! to fixed wire names; anything else is a custom kind carried verbatim.
//!
//! [`Priority`] is recorded on every envelope but is informational only: the
//! queue is strict FIFO regardless of priority.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::UpdateError;

/// Kind of update carried by an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum UpdateKind {
    /// `job_status`
    JobStatus,
    /// `payment_status`
    PaymentStatus,
    /// `location_update`
    LocationUpdate,
    /// `availability_change`
    AvailabilityChange,
    /// `system_alert`
    SystemAlert,
    /// Any other non-empty type name.
    Custom(Arc<str>),
}

impl UpdateKind {
    /// Wire names reserved for the typed senders.
    pub const RESERVED: [&'static str; 5] = [
        "job_status",
        "payment_status",
        "location_update",
        "availability_change",
        "system_alert",
    ];

    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            UpdateKind::JobStatus => "job_status",
            UpdateKind::PaymentStatus => "payment_status",
            UpdateKind::LocationUpdate => "location_update",
            UpdateKind::AvailabilityChange => "availability_change",
            UpdateKind::SystemAlert => "system_alert",
            UpdateKind::Custom(name) => name,
        }
    }

    /// Builds a custom kind, rejecting empty and reserved names.
    ///
    /// # Example
    /// ```
    /// use fieldlink::{UpdateKind, UpdateError};
    ///
    /// assert!(UpdateKind::custom("invoice_ready").is_ok());
    /// assert_eq!(UpdateKind::custom(""), Err(UpdateError::EmptyKind));
    /// assert!(UpdateKind::custom("job_status").is_err());
    /// ```
    pub fn custom(name: impl AsRef<str>) -> Result<Self, UpdateError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(UpdateError::EmptyKind);
        }
        if Self::RESERVED.contains(&name) {
            return Err(UpdateError::ReservedKind {
                kind: name.to_string(),
            });
        }
        Ok(UpdateKind::Custom(Arc::from(name)))
    }

    /// Returns `true` for kinds outside the built-in set.
    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self, UpdateKind::Custom(_))
    }
}

impl From<String> for UpdateKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "job_status" => UpdateKind::JobStatus,
            "payment_status" => UpdateKind::PaymentStatus,
            "location_update" => UpdateKind::LocationUpdate,
            "availability_change" => UpdateKind::AvailabilityChange,
            "system_alert" => UpdateKind::SystemAlert,
            _ => UpdateKind::Custom(Arc::from(name)),
        }
    }
}

impl From<UpdateKind> for String {
    fn from(kind: UpdateKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery priority recorded on an envelope.
///
/// Informational only; never reorders the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}
