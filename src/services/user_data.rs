use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::SessionError;
use crate::models::analytics::AnalyticsRecord;
use crate::models::captured_record::CapturedRecord;
use crate::session::{SessionKey, SessionStore};

/// The captured record and the analytics written for this load.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub user_data: CapturedRecord,
    pub analytics: AnalyticsRecord,
}

/// First half of an analytics refresh: what was read before the write.
#[derive(Debug, Clone)]
pub struct PendingRefresh {
    record: CapturedRecord,
    prior: Option<AnalyticsRecord>,
}

impl PendingRefresh {
    pub fn prior_logins(&self) -> u64 {
        self.prior.as_ref().map_or(0, |p| p.total_logins)
    }
}

/// Typed access to the captured record and its analytics in a session store.
pub struct UserDataContext<S> {
    store: S,
}

impl<S: SessionStore> UserDataContext<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the stored record. Nothing from the previous record is kept.
    pub fn update_user_data(&mut self, record: &CapturedRecord) -> Result<(), SessionError> {
        self.write(SessionKey::UserData, record)?;
        log::info!("User data updated for {}", record.display_name());
        Ok(())
    }

    pub fn user_data(&self) -> Result<Option<CapturedRecord>, SessionError> {
        self.read(SessionKey::UserData)
    }

    pub fn analytics(&self) -> Result<Option<AnalyticsRecord>, SessionError> {
        self.read(SessionKey::Analytics)
    }

    pub fn clear_user_data(&mut self) {
        self.store.clear(SessionKey::UserData);
        self.store.clear(SessionKey::Analytics);
    }

    /// Read the record and its current analytics. `None` when nothing has been captured.
    pub fn begin_refresh(&self) -> Result<Option<PendingRefresh>, SessionError> {
        let Some(record) = self.user_data()? else {
            return Ok(None);
        };
        let prior = self.analytics()?;
        Ok(Some(PendingRefresh { record, prior }))
    }

    /// Write the analytics that follow `pending`. There is no check that the
    /// stored analytics are still the ones `pending` read, so interleaved
    /// refreshes lose updates.
    pub fn commit_refresh(
        &mut self,
        pending: PendingRefresh,
        now: DateTime<Utc>,
    ) -> Result<DashboardSnapshot, SessionError> {
        let analytics = AnalyticsRecord::next(pending.prior.as_ref(), &pending.record, now);
        self.write(SessionKey::Analytics, &analytics)?;
        Ok(DashboardSnapshot {
            user_data: pending.record,
            analytics,
        })
    }

    pub fn refresh(&mut self) -> Result<Option<DashboardSnapshot>, SessionError> {
        match self.begin_refresh()? {
            Some(pending) => self.commit_refresh(pending, Utc::now()).map(Some),
            None => Ok(None),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: SessionKey) -> Result<Option<T>, SessionError> {
        self.store
            .get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|source| SessionError::Corrupt { key, source })
    }

    fn write<T: Serialize>(&mut self, key: SessionKey, value: &T) -> Result<(), SessionError> {
        let json =
            serde_json::to_string(value).map_err(|source| SessionError::Serialize { key, source })?;
        self.store.set(key, json)
    }
}
