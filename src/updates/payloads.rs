//! # Typed payloads, one flat record per built-in update kind.
//!
//! Field names serialize in camelCase and enum values in snake_case, matching
//! the shapes the server side expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Posted,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

/// Job status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusUpdate {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_name: Option<String>,
    /// Target of the resulting envelope.
    pub client_id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

/// Payment status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub payment_id: String,
    pub status: PaymentStatus,
    pub amount: f64,
    /// ISO 4217 code, e.g. `"GBP"`.
    pub currency: String,
    /// Target of the resulting envelope.
    pub user_id: String,
    pub description: String,
}

/// Position fix reported by a user's device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in metres.
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

/// Engineer availability change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityUpdate {
    pub engineer_id: String,
    pub is_available: bool,
    pub service_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available: Option<DateTime<Utc>>,
}

/// Severity of a system alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
    Success,
}

/// Operator-facing alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAlert {
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub action_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_update_wire_shape() {
        let update = JobStatusUpdate {
            job_id: "job-7".into(),
            status: JobStatus::InProgress,
            engineer_id: Some("eng-1".into()),
            engineer_name: None,
            client_id: "client-3".into(),
            client_name: "Acme".into(),
            message: None,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({
                "jobId": "job-7",
                "status": "in_progress",
                "engineerId": "eng-1",
                "clientId": "client-3",
                "clientName": "Acme",
            })
        );
    }

    #[test]
    fn alert_parses_from_wire() {
        let alert: SystemAlert = serde_json::from_value(json!({
            "title": "Maintenance",
            "message": "Down at 2am",
            "severity": "warning",
            "actionRequired": false,
        }))
        .unwrap();
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert!(alert.action_url.is_none());
    }
}
