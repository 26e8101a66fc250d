use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::captured_record::CapturedRecord;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSource {
    Mobile,
    Desktop,
}

impl DeviceSource {
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        match user_agent {
            Some(ua) if ua.contains("Mobile") => DeviceSource::Mobile,
            _ => DeviceSource::Desktop,
        }
    }
}

/// Derived per-visit statistics kept next to the captured record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    pub last_login: DateTime<Utc>,
    pub source: DeviceSource,
    /// The record's `id`, whatever its JSON type.
    #[serde(default)]
    pub user_id: Value,
    pub total_logins: u64,
}

impl AnalyticsRecord {
    /// The record that follows `prior` after one more load of `record`.
    pub fn next(
        prior: Option<&AnalyticsRecord>,
        record: &CapturedRecord,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            last_login: now,
            source: DeviceSource::from_user_agent(record.user_agent()),
            user_id: record.id().cloned().unwrap_or(Value::Null),
            // The prior count comes from a client cookie; it may be anything.
            total_logins: prior.map_or(0, |p| p.total_logins).saturating_add(1),
        }
    }
}
