use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A placeholder the template expects, e.g. `student_name`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct TemplateVariable {
    #[schema(example = "student_name")]
    pub name: String,
    #[schema(example = "Full name of the student")]
    pub description: Option<String>,
    #[schema(example = "student")]
    pub category: Option<String>,
}

/// Reusable letter text with `{{ placeholder }}` tokens.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Template {
    pub id: Uuid,
    #[schema(example = "Graduate school recommendation")]
    pub name: String,
    #[schema(example = "Dear {{ recipient_name }},\n\nI am pleased to recommend {{ student_name }}...")]
    pub content: String,
    pub variables: Vec<TemplateVariable>,
    /// At most one template is the default at any time.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTemplatePayload {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTemplatePayload {
    pub name: Option<String>,
    pub content: Option<String>,
    pub variables: Option<Vec<TemplateVariable>>,
    pub is_default: Option<bool>,
}
