use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::SessionError;
use crate::session::{SessionKey, SessionStore, ensure_fits};

/// In-process store. Clones share the same entries, which lets two handles
/// stand in for two browser tabs looking at one cookie jar.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<SessionKey, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<SessionKey, String>> {
        // A panicked writer cannot leave a half-written String behind.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<String>, SessionError> {
        Ok(self.entries().get(&key).cloned())
    }

    fn set(&mut self, key: SessionKey, value: String) -> Result<(), SessionError> {
        ensure_fits(key, value.len())?;
        self.entries().insert(key, value);
        Ok(())
    }

    fn clear(&mut self, key: SessionKey) {
        self.entries().remove(&key);
    }
}
