//! Session lifecycle and idle-timeout enforcement.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use warden_core::{Clock, SystemClock};

use crate::config::{SessionContext, SessionManagerConfig};
use crate::dao::{MemorySessionDao, SessionDao};
use crate::error::{SessionError, SessionResult};
use crate::listener::SessionListener;
use crate::session::{Session, SessionId, SessionState};

/// Outcome of one validation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Active sessions checked.
    pub examined: usize,
    /// Sessions transitioned to expired by this sweep.
    pub expired: usize,
    /// Invalid sessions removed from the store.
    pub purged: usize,
}

/// Sole authority over session state.
///
/// Every mutation of a session happens under that session's own async
/// mutex, so unrelated sessions never contend. Expiry is detected lazily on
/// access and eagerly by [`SessionManager::validate_sessions`]; both use
/// [`crate::is_expired`].
///
/// Stopped and expired sessions stay in the store as tombstones, so further
/// access keeps failing with [`SessionError::Stopped`] or
/// [`SessionError::Expired`], until a sweep purges them (when
/// [`SessionManagerConfig::delete_invalid_sessions`] is set).
pub struct SessionManager {
    dao: Arc<dyn SessionDao>,
    clock: Arc<dyn Clock>,
    config: SessionManagerConfig,
    listeners: Vec<Arc<dyn SessionListener>>,
    locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("listeners", &self.listeners.len())
            .field("locks", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionManagerConfig::default())
    }
}

impl SessionManager {
    /// Manager over an in-memory store and the system clock.
    #[must_use]
    pub fn new(config: SessionManagerConfig) -> Self {
        Self {
            dao: Arc::new(MemorySessionDao::new()),
            clock: Arc::new(SystemClock),
            config,
            listeners: Vec::new(),
            locks: DashMap::new(),
        }
    }

    /// Persist sessions through `dao`.
    #[must_use]
    pub fn with_dao(mut self, dao: Arc<dyn SessionDao>) -> Self {
        self.dao = dao;
        self
    }

    /// Read time from `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a lifecycle listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Active settings.
    #[must_use]
    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Create a session and return its id.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the store rejects the new session.
    pub async fn start(&self, context: &SessionContext) -> SessionResult<SessionId> {
        let timeout = context.timeout().or(self.config.global_timeout);
        let session = Session::new(self.clock.now(), timeout, context.host().map(str::to_owned));
        let id = session.id();
        self.dao.create(&session).await?;
        tracing::info!(session_id = %id, host = ?session.host(), ?timeout, "session started");
        for listener in &self.listeners {
            listener.on_start(&session);
        }
        Ok(id)
    }

    /// Snapshot of a valid session. Does not count as access.
    ///
    /// A session found past its idle timeout is marked expired here.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unknown`], [`SessionError::Stopped`] or
    /// [`SessionError::Expired`].
    pub async fn get_session(&self, id: &SessionId) -> SessionResult<Session> {
        let _guard = self.lock(id).await;
        self.load_valid(id).await
    }

    /// Record access, resetting the idle timer.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn touch(&self, id: &SessionId) -> SessionResult<()> {
        self.mutate(id, |session, now| session.touch(now)).await
    }

    /// End the session.
    ///
    /// A second stop fails with [`SessionError::Stopped`]; callers treat it
    /// as already logged out.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn stop(&self, id: &SessionId) -> SessionResult<()> {
        let _guard = self.lock(id).await;
        let mut session = self.load_valid(id).await?;
        session.stop(self.clock.now());
        self.dao.update(&session).await?;
        tracing::info!(session_id = %id, "session stopped");
        for listener in &self.listeners {
            listener.on_stop(&session);
        }
        Ok(())
    }

    /// Read an attribute.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn get_attribute(
        &self,
        id: &SessionId,
        key: &str,
    ) -> SessionResult<Option<serde_json::Value>> {
        Ok(self.get_session(id).await?.attribute(key).cloned())
    }

    /// Store an attribute. Storing `Value::Null` removes the key.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidAttributeKey`] for a blank key, otherwise as
    /// [`SessionManager::get_session`].
    pub async fn set_attribute(
        &self,
        id: &SessionId,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> SessionResult<()> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SessionError::InvalidAttributeKey);
        }
        self.mutate(id, move |session, _| {
            if value.is_null() {
                session.attributes_mut().remove(&key);
            } else {
                session.attributes_mut().insert(key, value);
            }
        })
        .await
    }

    /// Remove an attribute, returning its previous value.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn remove_attribute(
        &self,
        id: &SessionId,
        key: &str,
    ) -> SessionResult<Option<serde_json::Value>> {
        let mut removed = None;
        self.mutate(id, |session, _| removed = session.attributes_mut().remove(key))
            .await?;
        Ok(removed)
    }

    /// Attribute keys in sorted order.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn attribute_keys(&self, id: &SessionId) -> SessionResult<Vec<String>> {
        Ok(self.get_session(id).await?.attributes().keys().cloned().collect())
    }

    /// Change one session's idle timeout; `None` disables expiry.
    ///
    /// # Errors
    ///
    /// As [`SessionManager::get_session`].
    pub async fn set_timeout(
        &self,
        id: &SessionId,
        timeout: Option<Duration>,
    ) -> SessionResult<()> {
        self.mutate(id, |session, _| session.set_timeout(timeout)).await
    }

    /// Whether the session exists and is valid right now.
    pub async fn is_valid(&self, id: &SessionId) -> bool {
        self.get_session(id).await.is_ok()
    }

    /// Sessions in the active state, not counting ones whose timeout has
    /// lapsed unnoticed.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the store fails.
    pub async fn active_session_count(&self) -> SessionResult<usize> {
        let now = self.clock.now();
        Ok(self
            .dao
            .sessions()
            .await?
            .iter()
            .filter(|s| s.is_active() && !s.is_timed_out(now))
            .count())
    }

    /// Sweep every stored session, expiring idle ones and purging invalid
    /// ones if configured.
    ///
    /// The cutoff is taken once at the start. A session touched after that
    /// is re-read under its lock and left alone.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if listing the store fails. Failures on
    /// individual sessions are logged and skipped.
    pub async fn validate_sessions(&self) -> SessionResult<ValidationReport> {
        let now = self.clock.now();
        let mut report = ValidationReport::default();

        for candidate in self.dao.sessions().await? {
            let id = candidate.id();
            if candidate.is_active() {
                report.examined = report.examined.saturating_add(1);
                if !candidate.is_timed_out(now) {
                    continue;
                }
            } else if !self.config.delete_invalid_sessions {
                continue;
            }

            match self.sweep_one(&id, now).await {
                Ok(outcome) => {
                    if outcome.expired {
                        report.expired = report.expired.saturating_add(1);
                    }
                    if outcome.purged {
                        report.purged = report.purged.saturating_add(1);
                    }
                },
                Err(e) => {
                    tracing::warn!(session_id = %id, error = %e, "failed to validate session");
                },
            }
        }

        tracing::info!(
            examined = report.examined,
            expired = report.expired,
            purged = report.purged,
            "session validation sweep finished"
        );
        Ok(report)
    }

    async fn sweep_one(
        &self,
        id: &SessionId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> SessionResult<SweepOutcome> {
        let guard = self.lock(id).await;
        let mut outcome = SweepOutcome::default();

        let Some(mut session) = self.dao.read(id).await? else {
            drop(guard);
            self.locks.remove(id);
            return Ok(outcome);
        };

        if session.is_active() {
            if !session.is_timed_out(now) {
                tracing::debug!(session_id = %id, "session touched during sweep, skipping");
                return Ok(outcome);
            }
            self.expire(&mut session).await?;
            outcome.expired = true;
        }

        if self.config.delete_invalid_sessions {
            self.dao.delete(id).await?;
            outcome.purged = true;
            drop(guard);
            self.locks.remove(id);
            tracing::debug!(session_id = %id, state = ?session.state(), "invalid session purged");
        }
        Ok(outcome)
    }

    async fn lock(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let mutex = Arc::clone(
            self.locks
                .entry(*id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        mutex.lock_owned().await
    }

    /// Load a session and check it is usable. Caller holds the lock.
    async fn load_valid(&self, id: &SessionId) -> SessionResult<Session> {
        let Some(mut session) = self.dao.read(id).await? else {
            // Keep probes for unknown ids from growing the lock table.
            self.locks.remove(id);
            return Err(SessionError::Unknown(*id));
        };
        match session.state() {
            SessionState::Stopped => return Err(SessionError::Stopped(*id)),
            SessionState::Expired => return Err(SessionError::Expired(*id)),
            SessionState::Active => {},
        }
        if session.is_timed_out(self.clock.now()) {
            self.expire(&mut session).await?;
            return Err(SessionError::Expired(*id));
        }
        Ok(session)
    }

    /// Mark expired, persist and notify. Caller holds the lock.
    async fn expire(&self, session: &mut Session) -> SessionResult<()> {
        session.expire(self.clock.now());
        self.dao.update(session).await?;
        tracing::info!(
            session_id = %session.id(),
            last_access = %session.last_access_time(),
            "session expired"
        );
        for listener in &self.listeners {
            listener.on_expiration(session);
        }
        Ok(())
    }

    async fn mutate<F>(&self, id: &SessionId, f: F) -> SessionResult<()>
    where
        F: FnOnce(&mut Session, chrono::DateTime<chrono::Utc>) + Send,
    {
        let _guard = self.lock(id).await;
        let mut session = self.load_valid(id).await?;
        f(&mut session, self.clock.now());
        self.dao.update(&session).await
    }
}

#[derive(Debug, Default)]
struct SweepOutcome {
    expired: bool,
    purged: bool,
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
