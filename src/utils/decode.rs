use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};

use crate::errors::{CaptureError, DecodeError};
use crate::models::captured_record::CapturedRecord;

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub type DecodeStrategy = fn(&str) -> Result<CapturedRecord, CaptureError>;

/// Tried in order; the first success wins.
pub const STRATEGIES: &[(&str, DecodeStrategy)] = &[
    ("uri+base64", uri_then_base64),
    ("base64", raw_base64),
    ("forgiving-base64", forgiving_base64),
];

/// Decode a capture token into a normalized record, stamping `now` if the
/// record has no timestamp of its own.
pub fn decode_token_at(token: &str, now: DateTime<Utc>) -> Result<CapturedRecord, CaptureError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CaptureError::NoData);
    }

    let mut failure: Option<CaptureError> = None;
    for (name, strategy) in STRATEGIES {
        match strategy(token) {
            Ok(record) => {
                log::debug!("Capture token decoded with {} strategy", name);
                return Ok(record.with_default_timestamp(now));
            }
            Err(err) => {
                log::debug!("{} strategy failed: {}", name, err);
                // Text that decoded but did not parse says more than a bad alphabet.
                let keep_previous = matches!(failure, Some(CaptureError::Parse(_)))
                    && !matches!(err, CaptureError::Parse(_));
                if !keep_previous {
                    failure = Some(err);
                }
            }
        }
    }

    Err(failure.unwrap_or(CaptureError::NoData))
}

pub fn decode_token(token: &str) -> Result<CapturedRecord, CaptureError> {
    decode_token_at(token, Utc::now())
}

fn uri_then_base64(token: &str) -> Result<CapturedRecord, CaptureError> {
    let uri_decoded = urlencoding::decode(token).map_err(DecodeError::PercentEncoding)?;
    let bytes = LENIENT_STANDARD.decode(uri_decoded.as_bytes()).map_err(DecodeError::from)?;
    parse_record(bytes)
}

fn raw_base64(token: &str) -> Result<CapturedRecord, CaptureError> {
    let bytes = LENIENT_STANDARD.decode(token).map_err(DecodeError::from)?;
    parse_record(bytes)
}

/// Last resort: undo query-string `+` to space mangling, drop stray
/// whitespace and accept the URL-safe alphabet.
fn forgiving_base64(token: &str) -> Result<CapturedRecord, CaptureError> {
    let normalized: String = token
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('+'),
            '-' => Some('+'),
            '_' => Some('/'),
            c if c.is_ascii_whitespace() => None,
            c => Some(c),
        })
        .collect();
    let bytes = LENIENT_STANDARD.decode(normalized).map_err(DecodeError::from)?;
    parse_record(bytes)
}

fn parse_record(bytes: Vec<u8>) -> Result<CapturedRecord, CaptureError> {
    let text = String::from_utf8(bytes).map_err(DecodeError::Utf8)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    fn sample() -> Value {
        json!({
            "id": 1001,
            "username": "sam.creates",
            "recordedAt": "2026-04-30T08:15:00.000Z",
            "ip": "203.0.113.9",
            "userAgent": "Mozilla/5.0 (Linux; Android 14) Mobile Safari/537.36",
            "type": "signup",
            "campaign": "spring"
        })
    }

    fn to_value(record: &CapturedRecord) -> Value {
        serde_json::to_value(record).unwrap()
    }

    #[test]
    fn uri_encoded_base64_recovers_the_object() {
        let token = urlencoding::encode(&STANDARD.encode(sample().to_string())).into_owned();
        let record = decode_token_at(&token, now()).unwrap();
        assert_eq!(to_value(&record), sample());

        // Padding survives as %3D.
        let record = decode_token_at("eyJpZCI6MX0%3D", now()).unwrap();
        assert_eq!(record.id(), Some(&json!(1)));
    }

    #[test]
    fn raw_base64_recovers_the_object() {
        let token = STANDARD.encode(sample().to_string());
        let record = decode_token_at(&token, now()).unwrap();
        assert_eq!(to_value(&record), sample());
    }

    #[test]
    fn url_safe_and_space_mangled_tokens_fall_through_to_forgiving_decoder() {
        // Bytes chosen so the standard encoding contains '+' and '/'.
        let payload = json!({"username": "ü>>>???~~~", "id": 3}).to_string();
        let standard = STANDARD.encode(&payload);
        assert!(standard.contains('+') || standard.contains('/'));

        let url_safe = URL_SAFE_NO_PAD.encode(&payload);
        let record = decode_token_at(&url_safe, now()).unwrap();
        assert_eq!(record.id(), Some(&json!(3)));

        let mangled = standard.replace('+', " ");
        let record = decode_token_at(&mangled, now()).unwrap();
        assert_eq!(record.username(), Some("ü>>>???~~~"));
    }

    #[test]
    fn missing_timestamp_is_injected() {
        let mut source = sample();
        source.as_object_mut().unwrap().remove("recordedAt");
        let token = STANDARD.encode(source.to_string());

        let record = decode_token_at(&token, now()).unwrap();
        assert_eq!(record.recorded_at(), Some("2026-05-01T12:00:00.000Z"));

        source["recordedAt"] = json!("2026-05-01T12:00:00.000Z");
        assert_eq!(to_value(&record), source);
    }

    #[test]
    fn empty_token_is_no_data() {
        assert!(matches!(decode_token_at("", now()), Err(CaptureError::NoData)));
        assert!(matches!(decode_token_at("  \n", now()), Err(CaptureError::NoData)));
    }

    #[test]
    fn garbage_token_is_a_decode_failure() {
        let err = decode_token_at("***not base64 at all***", now()).unwrap_err();
        assert!(matches!(err, CaptureError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn decodable_non_object_is_a_parse_failure() {
        for text in ["hello there", "[1,2,3]", "\"quoted\"", "null"] {
            let token = STANDARD.encode(text);
            let err = decode_token_at(&token, now()).unwrap_err();
            assert!(matches!(err, CaptureError::Parse(_)), "{text}: got {err:?}");
        }
    }

    #[test]
    fn objects_with_unexpected_value_types_decode_unchanged() {
        let source = json!({
            "id": "seven",
            "username": null,
            "ip": ["198.51.100.1", "198.51.100.2"],
            "userAgent": 12,
            "recordedAt": "2026-04-30T08:15:00.000Z"
        });
        let token = STANDARD.encode(source.to_string());

        let record = decode_token_at(&token, now()).unwrap();
        assert_eq!(to_value(&record), source);
        assert_eq!(record.id(), Some(&json!("seven")));
        assert_eq!(record.display_name(), "unknown");
    }

    #[test]
    fn strategies_are_listed_in_fallback_order() {
        let names: Vec<_> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["uri+base64", "base64", "forgiving-base64"]);
    }
}
