use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record recovered from a capture token.
///
/// The token's JSON object is kept as-is, so any key and any value type
/// round-trips unchanged (including explicit nulls). The accessors give a
/// typed view of the keys the dashboard reads and return `None` when a key
/// is missing or holds another type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct CapturedRecord(Map<String, Value>);

impl CapturedRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get("id").filter(|value| !value.is_null())
    }

    pub fn username(&self) -> Option<&str> {
        self.str_field("username")
    }

    pub fn recorded_at(&self) -> Option<&str> {
        self.str_field("recordedAt")
    }

    pub fn ip(&self) -> Option<&str> {
        self.str_field("ip")
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.str_field("userAgent")
    }

    pub fn kind(&self) -> Option<&str> {
        self.str_field("type")
    }

    /// Fill in `recordedAt` when the token's value is missing or falsy
    /// (`null`, `false`, `0`, `""`). Any other value is left alone.
    pub fn with_default_timestamp(mut self, now: DateTime<Utc>) -> Self {
        if self.0.get("recordedAt").is_none_or(is_falsy) {
            self.0.insert(
                "recordedAt".to_string(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        self
    }

    pub fn display_name(&self) -> String {
        match self.0.get("username") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(value: Value) -> CapturedRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn injects_timestamp_only_when_missing_or_falsy() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let injected = CapturedRecord::default().with_default_timestamp(now);
        assert_eq!(injected.recorded_at(), Some("2026-01-02T03:04:05.000Z"));

        let kept = record(json!({"recordedAt": "2020-01-01T00:00:00Z"})).with_default_timestamp(now);
        assert_eq!(kept.recorded_at(), Some("2020-01-01T00:00:00Z"));

        for falsy in [json!(""), json!(null), json!(0), json!(false)] {
            let filled = record(json!({ "recordedAt": falsy })).with_default_timestamp(now);
            assert_eq!(filled.recorded_at(), Some("2026-01-02T03:04:05.000Z"));
        }

        let numeric = record(json!({"recordedAt": 17})).with_default_timestamp(now);
        assert_eq!(numeric.get("recordedAt"), Some(&json!(17)));
    }

    #[test]
    fn any_object_round_trips_unchanged() {
        let source = json!({
            "id": "u-123",
            "username": 42,
            "ip": null,
            "type": "referral",
            "campaign": {"name": "spring", "wave": 2},
            "tags": ["a", "b"]
        });

        let record = record(source.clone());
        assert_eq!(serde_json::to_value(&record).unwrap(), source);
        assert_eq!(record.id(), Some(&json!("u-123")));
        assert_eq!(record.kind(), Some("referral"));
        assert_eq!(record.username(), None);
        assert_eq!(record.display_name(), "42");
        assert_eq!(record.ip(), None);
    }

    #[test]
    fn non_object_json_is_rejected() {
        for value in [json!([1, 2]), json!("text"), json!(3), json!(null)] {
            assert!(serde_json::from_value::<CapturedRecord>(value).is_err());
        }
    }
}
