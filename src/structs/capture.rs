use serde::{Deserialize, Serialize};

use crate::models::analytics::AnalyticsRecord;
use crate::models::captured_record::CapturedRecord;
use crate::services::capture::{CaptureOutcome, CaptureStatus};

#[derive(Deserialize)]
pub struct CaptureParams {
    pub data: Option<String>,
}

#[derive(Deserialize)]
pub struct DecodeRequest {
    #[serde(default)]
    pub data: String,
}

/// Result of decoding a token ahead of the capture page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedData {
    pub success: bool,
    pub message: String,
    pub user_data: Option<CapturedRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub status: CaptureStatus,
    pub message: &'static str,
    pub redirect_to: String,
    pub delay_seconds: u64,
}

impl From<&CaptureOutcome> for CaptureResponse {
    fn from(outcome: &CaptureOutcome) -> Self {
        Self {
            status: outcome.status,
            message: outcome.message,
            redirect_to: outcome.redirect.path.clone(),
            delay_seconds: outcome.redirect.delay.as_secs(),
        }
    }
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_data: Option<CapturedRecord>,
    pub analytics: Option<AnalyticsRecord>,
    pub error: Option<&'static str>,
}
