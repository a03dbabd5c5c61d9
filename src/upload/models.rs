use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored upload that passed both validation phases.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub request_id: Uuid,
    /// What the uploader called the file. Display only; the storage path
    /// uses a random token instead.
    #[schema(example = "transcript.pdf")]
    pub original_filename: String,
    #[schema(example = "k3J9fQ2mXw8sL1aZ.pdf")]
    pub stored_filename: String,
    /// Canonical MIME of the sniffed content, not the declared one.
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// One incoming file before validation.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_filename: String,
    pub declared_mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct InvalidUpload {
    #[schema(example = "paper.png")]
    pub original_filename: String,
    #[schema(example = "file content does not match its declared type")]
    pub reason: String,
}

/// Outcome of a batch upload: every input file lands in exactly one list,
/// input order preserved within each.
#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct BatchUploadReport {
    pub valid: Vec<Document>,
    pub invalid: Vec<InvalidUpload>,
}
