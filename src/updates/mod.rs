//! Update model: envelope, kinds and typed payloads.
//!
//! ## Contents
//! - [`Envelope`], [`EnvelopeId`], [`UpdatePayload`] the immutable record and its id
//! - [`UpdateKind`], [`Priority`] classification (priority never reorders delivery)
//! - payload records for each built-in kind

mod envelope;
mod kind;
mod payloads;

pub use envelope::{Envelope, EnvelopeId, SYSTEM_USER, UpdatePayload};
pub use kind::{Priority, UpdateKind};
pub use payloads::{
    AlertSeverity, AvailabilityUpdate, JobStatus, JobStatusUpdate, LocationUpdate, PaymentStatus,
    PaymentStatusUpdate, SystemAlert,
};
