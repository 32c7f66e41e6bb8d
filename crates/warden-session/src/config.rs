//! Session manager settings.

use std::time::Duration;

/// Default idle timeout: 30 minutes.
pub const DEFAULT_GLOBAL_TIMEOUT: Duration = Duration::from_secs(1800);

/// Default interval between validation sweeps: 1 hour.
pub const DEFAULT_VALIDATION_INTERVAL: Duration = Duration::from_secs(3600);

/// Settings for [`crate::SessionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionManagerConfig {
    /// Idle timeout for new sessions; `None` means sessions never expire.
    pub global_timeout: Option<Duration>,
    /// Whether [`crate::SessionManager::spawn_validation`] starts a sweep task.
    pub validation_enabled: bool,
    /// Time between validation sweeps.
    pub validation_interval: Duration,
    /// Whether sweeps delete stopped and expired sessions from the store.
    pub delete_invalid_sessions: bool,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            global_timeout: Some(DEFAULT_GLOBAL_TIMEOUT),
            validation_enabled: true,
            validation_interval: DEFAULT_VALIDATION_INTERVAL,
            delete_invalid_sessions: true,
        }
    }
}

/// Per-session creation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    host: Option<String>,
    timeout: Option<Duration>,
}

impl SessionContext {
    /// Context with no host and the global timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the client host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the global idle timeout for this session.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Client host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Timeout override.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
