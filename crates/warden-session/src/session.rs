//! Session identity, state and the shared expiry predicate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle state. `Stopped` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Usable.
    Active,
    /// Ended by logout.
    Stopped,
    /// Ended by idle timeout.
    Expired,
}

/// Whether a session last accessed at `last_access` has outlived `timeout`
/// at `now`.
///
/// `None` never expires; a timeout too large to represent never expires
/// either. Exactly `timeout` of idle time is still valid.
#[must_use]
pub fn is_expired(
    last_access: DateTime<Utc>,
    timeout: Option<Duration>,
    now: DateTime<Utc>,
) -> bool {
    let Some(timeout) = timeout.and_then(|t| TimeDelta::from_std(t).ok()) else {
        return false;
    };
    now.signed_duration_since(last_access) > timeout
}

/// Session record as stored by a [`crate::SessionDao`].
///
/// Only [`crate::SessionManager`] changes a session; everyone else sees
/// snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    start_timestamp: DateTime<Utc>,
    last_access_time: DateTime<Utc>,
    stop_timestamp: Option<DateTime<Utc>>,
    timeout: Option<Duration>,
    host: Option<String>,
    attributes: BTreeMap<String, serde_json::Value>,
    state: SessionState,
}

impl Session {
    pub(crate) fn new(now: DateTime<Utc>, timeout: Option<Duration>, host: Option<String>) -> Self {
        Self {
            id: SessionId::new(),
            start_timestamp: now,
            last_access_time: now,
            stop_timestamp: None,
            timeout,
            host,
            attributes: BTreeMap::new(),
            state: SessionState::Active,
        }
    }

    /// Session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// When the session started.
    #[must_use]
    pub fn start_timestamp(&self) -> DateTime<Utc> {
        self.start_timestamp
    }

    /// Last time the session was touched.
    #[must_use]
    pub fn last_access_time(&self) -> DateTime<Utc> {
        self.last_access_time
    }

    /// When the session stopped or expired.
    #[must_use]
    pub fn stop_timestamp(&self) -> Option<DateTime<Utc>> {
        self.stop_timestamp
    }

    /// Idle timeout; `None` means the session never expires.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Originating host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Attribute map.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    /// Single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session is still active (ignores idle time).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Whether the idle timeout has elapsed at `now`.
    #[must_use]
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.last_access_time, self.timeout, now)
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access_time = now;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn stop(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::Stopped;
        self.stop_timestamp = Some(now);
    }

    pub(crate) fn expire(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::Expired;
        self.stop_timestamp = Some(now);
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut BTreeMap<String, serde_json::Value> {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired_boundaries() {
        let start = Utc::now();
        let timeout = Some(Duration::from_millis(100));
        let at = |ms| start.checked_add_signed(TimeDelta::milliseconds(ms)).unwrap();

        assert!(!is_expired(start, timeout, at(50)));
        assert!(!is_expired(start, timeout, at(100)));
        assert!(is_expired(start, timeout, at(101)));
        assert!(!is_expired(start, None, at(1_000_000)));
        // Access after `now` (clock skew, concurrent touch) is never expired.
        assert!(!is_expired(at(200), timeout, start));
    }

    #[test]
    fn test_huge_timeout_never_expires() {
        let start = Utc::now();
        let later = start.checked_add_signed(TimeDelta::days(365)).unwrap();
        assert!(!is_expired(start, Some(Duration::MAX), later));
    }

    #[test]
    fn test_session_id_round_trip() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_session_serde() {
        let mut session =
            Session::new(Utc::now(), Some(Duration::from_secs(60)), Some("10.0.0.1".into()));
        session
            .attributes_mut()
            .insert("cart".into(), serde_json::json!({"items": 3}));
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert_eq!(back.state(), SessionState::Active);
    }
}
