use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::errors::FieldError;

/// Body of `POST /api/submit`. Only the first three fields are checked; the
/// rest are accepted with whatever JSON type the client sent and only logged.
#[derive(Deserialize, Serialize, Validate, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[validate(
        required(message = "Full name is required"),
        length(min = 1, message = "Full name is required")
    )]
    #[serde(default, deserialize_with = "present_text")]
    pub full_name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        length(min = 1, message = "Email is required")
    )]
    #[serde(default, deserialize_with = "present_text")]
    pub email: Option<String>,
    #[validate(
        required(message = "Instagram handle is required"),
        length(min = 1, message = "Instagram handle is required")
    )]
    #[serde(default, deserialize_with = "present_text")]
    pub instagram_handle: Option<String>,
    pub followers: Option<Value>,
    pub engagement_rate: Option<Value>,
    pub niche: Option<Value>,
    pub content_type: Option<Value>,
    pub monthly_posts: Option<Value>,
    pub country: Option<Value>,
    pub age_range: Option<Value>,
    pub has_brand_deals: Option<Value>,
    pub monetization_goals: Option<Value>,
    pub agreement: Option<Value>,
}

/// Read a required field of any JSON type. Strings pass through, `null`,
/// `false` and `0` count as absent, and other values use their JSON text.
fn present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    })
}

/// Text for a log line: strings unquoted, anything else as JSON, `-` when absent.
pub fn log_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// (struct field, wire name) of every validated field, in reporting order.
const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("full_name", "fullName"),
    ("email", "email"),
    ("instagram_handle", "instagramHandle"),
];

/// Flatten validator output into one error per field, in a stable order.
pub fn missing_fields(errors: &ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    REQUIRED_FIELDS
        .iter()
        .filter_map(|(field, wire_name)| {
            let first = by_field.get(*field)?.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is required", wire_name));
            Some(FieldError {
                field: *wire_name,
                message,
            })
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: &'static str,
    pub application_id: String,
    pub next_steps: [&'static str; 3],
    pub estimated_review_time: &'static str,
}

impl SubmissionResponse {
    pub fn accepted(application_id: String) -> Self {
        Self {
            success: true,
            message: "Application submitted successfully",
            application_id,
            next_steps: [
                "Our team will review your application within 48 hours",
                "Check your email for confirmation",
                "You can track your application status in the dashboard",
            ],
            estimated_review_time: "48 hours",
        }
    }
}
