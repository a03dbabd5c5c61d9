use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::patch::Patch;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Submitted,
    InProgress,
    Completed,
}

/// One solicited recommendation letter, owner of its documents,
/// destinations and letter versions.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct LetterRequest {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub id: Uuid,
    /// Short code the student types to reach the upload page. Unique across
    /// all stored requests.
    #[schema(example = "7KQ2M9XR")]
    pub access_code: String,
    pub code_generated_at: DateTime<Utc>,
    pub status: RequestStatus,
    #[schema(example = "Ada Lovelace")]
    pub student_name: Option<String>,
    #[schema(example = "ada@example.edu")]
    pub student_email: Option<String>,
    #[schema(example = "Prof. Charles Babbage")]
    pub professor_name: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub professor_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateRequestPayload {
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub professor_name: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub professor_notes: Option<String>,
}

/// Partial update; omitted fields are left alone, explicit nulls clear.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRequestPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub student_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub student_email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub professor_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub deadline: Patch<DateTime<Utc>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub professor_notes: Patch<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: RequestStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub search: Option<String>,
}
