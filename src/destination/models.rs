use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::patch::Patch;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationMethod {
    Email,
    Download,
    Portal,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationStatus {
    Pending,
    Sent,
    Confirmed,
    Failed,
}

impl DestinationStatus {
    /// Sent and Confirmed both count towards request completion.
    pub fn counts_as_delivered(self) -> bool {
        matches!(self, DestinationStatus::Sent | DestinationStatus::Confirmed)
    }
}

/// One institution/channel the finished letter must reach.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SubmissionDestination {
    pub id: Uuid,
    pub request_id: Uuid,
    pub method: DestinationMethod,
    pub status: DestinationStatus,
    #[schema(example = "admissions@example.edu")]
    pub recipient_email: Option<String>,
    #[schema(example = "Dr. Jane Smith")]
    pub recipient_name: Option<String>,
    #[schema(example = "Example University")]
    pub institution_name: Option<String>,
    #[schema(example = "MSc Computer Science")]
    pub program_name: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionDestination {
    pub fn new(request_id: Uuid, method: DestinationMethod) -> Self {
        SubmissionDestination {
            id: Uuid::new_v4(),
            request_id,
            method,
            status: DestinationStatus::Pending,
            recipient_email: None,
            recipient_name: None,
            institution_name: None,
            program_name: None,
            sent_at: None,
            confirmed_at: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDestinationPayload {
    pub method: DestinationMethod,
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    pub institution_name: Option<String>,
    pub program_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDestinationPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub recipient_email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub recipient_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub institution_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub program_name: Patch<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FailDestinationPayload {
    #[schema(example = "SMTP connection refused")]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DispatchPayload {
    pub letter_id: Uuid,
}
