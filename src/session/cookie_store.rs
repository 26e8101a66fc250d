use std::collections::{HashMap, HashSet};

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponseBuilder};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::errors::SessionError;
use crate::session::{SessionKey, SessionStore, ensure_fits};

/// Session store over the request's cookies.
///
/// Reads come from the incoming `Cookie` header (overlaid with anything set
/// during this request); writes are queued and emitted as `Set-Cookie`
/// headers by [`CookieSessionStore::write_to`]. Values are base64url-encoded
/// JSON so they never need cookie-level escaping. A cookie that is present
/// but not valid base64url reads as [`SessionError::Unreadable`] until it is
/// overwritten or cleared.
pub struct CookieSessionStore {
    values: HashMap<SessionKey, String>,
    unreadable: HashSet<SessionKey>,
    outgoing: Vec<Cookie<'static>>,
    secure: bool,
}

impl CookieSessionStore {
    pub fn from_request(req: &HttpRequest, secure: bool) -> Self {
        let mut values = HashMap::new();
        let mut unreadable = HashSet::new();
        for key in SessionKey::ALL {
            let Some(cookie) = req.cookie(key.cookie_name()) else {
                continue;
            };
            match decode_value(cookie.value()) {
                Some(value) => {
                    values.insert(key, value);
                }
                None => {
                    log::warn!("Undecodable {} cookie on request", key.cookie_name());
                    unreadable.insert(key);
                }
            }
        }

        Self {
            values,
            unreadable,
            outgoing: Vec::new(),
            secure,
        }
    }

    /// Attach every queued cookie to the response.
    pub fn write_to(self, builder: &mut HttpResponseBuilder) {
        for cookie in self.outgoing {
            builder.cookie(cookie);
        }
    }

    fn queue(&mut self, key: SessionKey, value: String, max_age: Duration) {
        self.outgoing
            .retain(|cookie| cookie.name() != key.cookie_name());
        let cookie = Cookie::build(key.cookie_name(), value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .http_only(true)
            .finish();
        self.outgoing.push(cookie);
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError> {
        if self.unreadable.contains(&key) {
            return Err(SessionError::Unreadable { key });
        }
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: SessionKey, value: String) -> Result<(), SessionError> {
        let encoded = URL_SAFE_NO_PAD.encode(value.as_bytes());
        ensure_fits(key, encoded.len())?;

        self.queue(key, encoded, Duration::days(key.max_age_days()));
        self.unreadable.remove(&key);
        self.values.insert(key, value);
        Ok(())
    }

    fn clear(&mut self, key: SessionKey) {
        self.queue(key, String::new(), Duration::ZERO);
        self.unreadable.remove(&key);
        self.values.remove(&key);
    }
}

fn decode_value(raw: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    String::from_utf8(bytes).ok()
}
