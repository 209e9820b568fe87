//! # Update envelope: the only record moving through the channel.
//!
//! An [`Envelope`] wraps one typed payload with an id, a kind, a target user,
//! a creation timestamp and a priority. Envelopes are immutable once built and
//! are shared as `Arc<Envelope>` between the queue, the transport and the
//! dispatcher.
//!
//! ## Target and priority per kind
//! ```text
//! kind                 user_id                   priority
//! job_status           payload.client_id         high
//! payment_status       payload.user_id           high
//! location_update      payload.user_id           normal
//! availability_change  payload.engineer_id       normal
//! system_alert         target or "system"        urgent if severity=error, else normal
//! <custom>             caller supplied           caller supplied (default normal)
//! ```
//!
//! ## Example
//! ```rust
//! use fieldlink::{AlertSeverity, Envelope, Priority, SystemAlert};
//!
//! let env = Envelope::system_alert(
//!     SystemAlert {
//!         title: "Payments down".into(),
//!         message: "Card processor unreachable".into(),
//!         severity: AlertSeverity::Error,
//!         action_required: true,
//!         action_url: None,
//!     },
//!     None,
//! );
//! assert_eq!(env.priority(), Priority::Urgent);
//! assert_eq!(env.user_id(), "system");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::{Priority, UpdateKind};
use super::payloads::{
    AlertSeverity, AvailabilityUpdate, JobStatusUpdate, LocationUpdate, PaymentStatusUpdate,
    SystemAlert,
};
use crate::error::UpdateError;

/// User id used for broadcast alerts.
pub const SYSTEM_USER: &str = "system";

/// Unique envelope identifier (UUIDv7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeId(Uuid);

impl EnvelopeId {
    /// Generates a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Payload carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdatePayload {
    JobStatus(JobStatusUpdate),
    PaymentStatus(PaymentStatusUpdate),
    Location(LocationUpdate),
    Availability(AvailabilityUpdate),
    SystemAlert(SystemAlert),
    Custom(serde_json::Value),
}

/// Immutable update envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    id: EnvelopeId,
    #[serde(rename = "type")]
    kind: UpdateKind,
    user_id: String,
    payload: UpdatePayload,
    timestamp: DateTime<Utc>,
    priority: Priority,
}

impl Envelope {
    fn new(kind: UpdateKind, user_id: String, payload: UpdatePayload, priority: Priority) -> Self {
        Self {
            id: EnvelopeId::generate(),
            kind,
            user_id,
            payload,
            timestamp: Utc::now(),
            priority,
        }
    }

    /// Wraps a job status change; targets the client, priority `high`.
    pub fn job_status(update: JobStatusUpdate) -> Self {
        let user_id = update.client_id.clone();
        Self::new(
            UpdateKind::JobStatus,
            user_id,
            UpdatePayload::JobStatus(update),
            Priority::High,
        )
    }

    /// Wraps a payment status change; targets the payment's user, priority `high`.
    pub fn payment_status(update: PaymentStatusUpdate) -> Self {
        let user_id = update.user_id.clone();
        Self::new(
            UpdateKind::PaymentStatus,
            user_id,
            UpdatePayload::PaymentStatus(update),
            Priority::High,
        )
    }

    /// Wraps a location fix; targets the reporting user, priority `normal`.
    pub fn location(update: LocationUpdate) -> Self {
        let user_id = update.user_id.clone();
        Self::new(
            UpdateKind::LocationUpdate,
            user_id,
            UpdatePayload::Location(update),
            Priority::Normal,
        )
    }

    /// Wraps an availability change; targets the engineer, priority `normal`.
    pub fn availability(update: AvailabilityUpdate) -> Self {
        let user_id = update.engineer_id.clone();
        Self::new(
            UpdateKind::AvailabilityChange,
            user_id,
            UpdatePayload::Availability(update),
            Priority::Normal,
        )
    }

    /// Wraps an alert. `target = None` broadcasts to [`SYSTEM_USER`].
    ///
    /// Severity `error` yields priority `urgent`; every other severity yields `normal`.
    pub fn system_alert(alert: SystemAlert, target: Option<&str>) -> Self {
        let priority = match alert.severity {
            AlertSeverity::Error => Priority::Urgent,
            _ => Priority::Normal,
        };
        let user_id = target
            .filter(|t| !t.is_empty())
            .unwrap_or(SYSTEM_USER)
            .to_string();
        Self::new(
            UpdateKind::SystemAlert,
            user_id,
            UpdatePayload::SystemAlert(alert),
            priority,
        )
    }

    /// Wraps an arbitrary JSON payload under a custom kind.
    ///
    /// Fails if `kind` is blank or a built-in name, if `user_id` is blank, or if
    /// `priority` is `urgent` (only error alerts carry it).
    pub fn custom(
        kind: impl AsRef<str>,
        user_id: impl Into<String>,
        payload: serde_json::Value,
        priority: Option<Priority>,
    ) -> Result<Self, UpdateError> {
        if let Some(priority @ Priority::Urgent) = priority {
            return Err(UpdateError::ReservedPriority { priority });
        }
        let kind = UpdateKind::custom(kind)?;
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(UpdateError::EmptyUserId);
        }
        Ok(Self::new(
            kind,
            user_id,
            UpdatePayload::Custom(payload),
            priority.unwrap_or_default(),
        ))
    }

    #[inline]
    pub fn id(&self) -> EnvelopeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &UpdateKind {
        &self.kind
    }

    #[inline]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[inline]
    pub fn payload(&self) -> &UpdatePayload {
        &self.payload
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }
}
