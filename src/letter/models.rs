use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A generated letter body. Versions are monotonic within one request so
/// drafts stay traceable after regeneration.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Letter {
    pub id: Uuid,
    pub request_id: Uuid,
    pub content: String,
    #[schema(example = 1)]
    pub version: u32,
    /// Template the body was produced from, if any.
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Either a template with variable values, or a ready-made body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateLetterPayload {
    pub template_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: HashMap<String, Option<String>>,
    pub content: Option<String>,
}
