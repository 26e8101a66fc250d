use serde::Serialize;

use crate::config::{Redirect, RedirectConfig};
use crate::errors::CaptureError;
use crate::models::captured_record::CapturedRecord;
use crate::services::user_data::UserDataContext;
use crate::session::SessionStore;
use crate::structs::capture::ProcessedData;
use crate::utils::decode::decode_token;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureStatus {
    Pending,
    Success,
    Error,
    NoData,
}

impl CaptureStatus {
    /// State before any decoding: a capture without a token is already finished.
    pub fn initial(token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => CaptureStatus::Pending,
            _ => CaptureStatus::NoData,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, CaptureStatus::Pending)
    }
}

/// A terminal capture state and the single navigation it triggers.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub status: CaptureStatus,
    pub message: &'static str,
    pub redirect: Redirect,
    pub record: Option<CapturedRecord>,
}

/// Decode a token ahead of the capture page, folding any failure into the result.
pub fn decode_and_process(token: &str) -> ProcessedData {
    match decode_token(token) {
        Ok(record) => {
            log::info!("Successfully processed data for {}", record.display_name());
            ProcessedData {
                success: true,
                message: "Data processed successfully".to_string(),
                user_data: Some(record),
            }
        }
        Err(err) => {
            log::warn!("Error processing capture data: {}", err);
            ProcessedData {
                success: false,
                message: format!("Failed to process data: {}", err),
                user_data: None,
            }
        }
    }
}

pub struct CaptureController<'a> {
    redirects: &'a RedirectConfig,
}

impl<'a> CaptureController<'a> {
    pub fn new(redirects: &'a RedirectConfig) -> Self {
        Self { redirects }
    }

    /// Drive one capture from `pending` to a terminal state, storing the
    /// record on success. A successful `precomputed` result is used as-is;
    /// otherwise the token is decoded here.
    pub fn run<S: SessionStore>(
        &self,
        token: Option<&str>,
        precomputed: Option<ProcessedData>,
        context: &mut UserDataContext<S>,
    ) -> CaptureOutcome {
        let token = match (CaptureStatus::initial(token), token) {
            (CaptureStatus::Pending, Some(token)) => token,
            _ => return self.no_data(),
        };

        let reported = matches!(precomputed, Some(ProcessedData { success: false, .. }));
        let record = match precomputed {
            Some(ProcessedData {
                success: true,
                user_data: Some(record),
                ..
            }) => Ok(record),
            _ => decode_token(token),
        };

        let stored = record.and_then(|record| {
            context.update_user_data(&record)?;
            Ok(record)
        });

        match stored {
            Ok(record) => CaptureOutcome {
                status: CaptureStatus::Success,
                message: "Data loaded successfully",
                redirect: self.redirects.success.clone(),
                record: Some(record),
            },
            Err(CaptureError::NoData) => self.no_data(),
            Err(err) => {
                if already_reported(reported, &err) {
                    log::debug!("Capture failed again after precompute: {}", err);
                } else {
                    log::warn!("Capture failed: {}", err);
                }
                let message = match err {
                    CaptureError::Storage(_) => "Failed to update user data",
                    _ => "Failed to process data. Redirecting...",
                };
                CaptureOutcome {
                    status: CaptureStatus::Error,
                    message,
                    redirect: self.redirects.failure.clone(),
                    record: None,
                }
            }
        }
    }

    fn no_data(&self) -> CaptureOutcome {
        CaptureOutcome {
            status: CaptureStatus::NoData,
            message: "No data received",
            redirect: self.redirects.no_data.clone(),
            record: None,
        }
    }
}

/// A decode failure was already logged by [`decode_and_process`]; a storage
/// failure can only happen here.
fn already_reported(precompute_failed: bool, err: &CaptureError) -> bool {
    precompute_failed && !matches!(err, CaptureError::Storage(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SessionError;
    use crate::session::{MemorySessionStore, SessionKey};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn token(value: serde_json::Value) -> String {
        STANDARD.encode(value.to_string())
    }

    fn setup() -> (RedirectConfig, MemorySessionStore) {
        (RedirectConfig::default(), MemorySessionStore::new())
    }

    #[test]
    fn initial_state_depends_on_token_presence() {
        assert_eq!(CaptureStatus::initial(Some("abc")), CaptureStatus::Pending);
        assert_eq!(CaptureStatus::initial(Some("")), CaptureStatus::NoData);
        assert_eq!(CaptureStatus::initial(None), CaptureStatus::NoData);
        assert!(!CaptureStatus::Pending.is_terminal());
        assert!(CaptureStatus::Error.is_terminal());
    }

    #[test]
    fn missing_token_redirects_home() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store.clone());
        let outcome = CaptureController::new(&redirects).run(None, None, &mut context);

        assert_eq!(outcome.status, CaptureStatus::NoData);
        assert_eq!(outcome.redirect, redirects.no_data);
        assert_eq!(store.get(SessionKey::UserData).unwrap(), None);
    }

    #[test]
    fn bad_token_errors_to_a_different_target() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store.clone());
        let precomputed = decode_and_process("@@@");
        assert!(!precomputed.success);
        assert!(precomputed.message.starts_with("Failed to process data: "));

        let outcome =
            CaptureController::new(&redirects).run(Some("@@@"), Some(precomputed), &mut context);

        assert_eq!(outcome.status, CaptureStatus::Error);
        assert_eq!(outcome.redirect, redirects.failure);
        assert_ne!(outcome.redirect.path, redirects.no_data.path);
        assert!(outcome.record.is_none());
        assert_eq!(store.get(SessionKey::UserData).unwrap(), None);
    }

    #[test]
    fn valid_token_is_stored_and_redirects_to_dashboard() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store);
        let token = token(json!({"id": 4, "username": "lee"}));

        let outcome = CaptureController::new(&redirects).run(Some(&token), None, &mut context);

        assert_eq!(outcome.status, CaptureStatus::Success);
        assert_eq!(outcome.redirect.refresh_header(), "2; url=/dashboard");
        let stored = context.user_data().unwrap().unwrap();
        assert_eq!(stored.username(), Some("lee"));
        assert!(stored.recorded_at().is_some());
    }

    #[test]
    fn successful_precomputed_result_is_preferred() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store);
        let precomputed = ProcessedData {
            success: true,
            message: "Data processed successfully".to_string(),
            user_data: Some(
                serde_json::from_value(json!({"username": "from-server"})).unwrap(),
            ),
        };
        // The token itself is undecodable, so success can only come from the precomputed record.
        let outcome =
            CaptureController::new(&redirects).run(Some("@@@"), Some(precomputed), &mut context);

        assert_eq!(outcome.status, CaptureStatus::Success);
        assert_eq!(
            context.user_data().unwrap().unwrap().username(),
            Some("from-server")
        );
    }

    #[test]
    fn failed_precomputed_result_falls_back_to_local_decode() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store);
        let token = token(json!({"username": "fallback"}));
        let precomputed = ProcessedData {
            success: false,
            message: "Failed to process data: upstream".to_string(),
            user_data: None,
        };

        let outcome =
            CaptureController::new(&redirects).run(Some(&token), Some(precomputed), &mut context);
        assert_eq!(outcome.status, CaptureStatus::Success);
    }

    #[test]
    fn oversized_record_is_a_storage_error() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store.clone());
        let token = token(json!({"username": "big", "bio": "x".repeat(8 * 1024)}));

        let outcome = CaptureController::new(&redirects).run(Some(&token), None, &mut context);

        assert_eq!(outcome.status, CaptureStatus::Error);
        assert_eq!(outcome.message, "Failed to update user data");
        assert_eq!(outcome.redirect, redirects.failure);
        assert_eq!(store.get(SessionKey::UserData).unwrap(), None);
    }

    #[test]
    fn failure_seen_by_precompute_is_not_reported_twice() {
        let (redirects, store) = setup();
        let mut context = UserDataContext::new(store.clone());
        let precomputed = decode_and_process("%%%");
        let reported = matches!(precomputed, ProcessedData { success: false, .. });

        let err = decode_token("%%%").unwrap_err();
        assert!(already_reported(reported, &err));
        assert!(!already_reported(false, &err));

        let outcome =
            CaptureController::new(&redirects).run(Some("%%%"), Some(precomputed), &mut context);
        assert_eq!(outcome.status, CaptureStatus::Error);
        assert_eq!(outcome.message, "Failed to process data. Redirecting...");
        assert_eq!(store.get(SessionKey::UserData).unwrap(), None);
    }

    #[test]
    fn storage_failure_after_failed_precompute_is_still_reported() {
        let err = CaptureError::Storage(SessionError::TooLarge {
            name: "user_data",
            size: 5000,
            limit: 4096,
        });
        assert!(!already_reported(true, &err));
    }
}
