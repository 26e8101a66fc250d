//! Client-side session storage behind a narrow interface.
//!
//! Callers only see `get`/`set`/`clear` on a fixed set of keys, so the
//! backing store (browser cookies in production, a shared map in tests) can
//! change without touching them.

pub mod cookie_store;
pub mod memory_store;

pub use cookie_store::CookieSessionStore;
pub use memory_store::MemorySessionStore;

use crate::errors::SessionError;

/// Browsers cap a single cookie at roughly this many bytes.
pub const MAX_COOKIE_BYTES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    UserData,
    Analytics,
}

impl SessionKey {
    pub const ALL: [SessionKey; 2] = [SessionKey::UserData, SessionKey::Analytics];

    pub fn cookie_name(self) -> &'static str {
        match self {
            SessionKey::UserData => "user_data",
            SessionKey::Analytics => "user_analytics",
        }
    }

    pub fn max_age_days(self) -> i64 {
        match self {
            SessionKey::UserData => 7,
            SessionKey::Analytics => 30,
        }
    }
}

pub trait SessionStore {
    /// `Ok(None)` when nothing is stored; an error when something is stored
    /// but cannot be read back.
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError>;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: SessionKey, value: String) -> Result<(), SessionError>;

    fn clear(&mut self, key: SessionKey);
}

/// Reject values that would not fit in a single cookie.
pub(crate) fn ensure_fits(key: SessionKey, stored_len: usize) -> Result<(), SessionError> {
    let size = key.cookie_name().len() + stored_len;
    if size > MAX_COOKIE_BYTES {
        return Err(SessionError::TooLarge {
            name: key.cookie_name(),
            size,
            limit: MAX_COOKIE_BYTES,
        });
    }
    Ok(())
}
