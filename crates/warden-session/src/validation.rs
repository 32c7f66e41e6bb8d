//! Background validation sweeps.

use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::manager::SessionManager;

/// Handle to a running validation task.
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct ValidationHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ValidationHandle {
    /// Ask the task to stop after its current sweep.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "session validation task ended abnormally");
        }
    }
}

impl Drop for ValidationHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl SessionManager {
    /// Start periodic [`SessionManager::validate_sessions`] sweeps.
    ///
    /// Returns `None` when validation is disabled. The task holds only a
    /// weak reference and exits once the manager is dropped.
    #[must_use]
    pub fn spawn_validation(self: &Arc<Self>) -> Option<ValidationHandle> {
        if !self.config().validation_enabled {
            tracing::debug!("session validation disabled");
            return None;
        }

        let manager: Weak<Self> = Arc::downgrade(self);
        let period = self.config().validation_interval;
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = stop.cancelled() => break,
                    _ = interval.tick() => {},
                }
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                if let Err(e) = manager.validate_sessions().await {
                    tracing::warn!(error = %e, "session validation sweep failed");
                }
            }
            tracing::debug!("session validation task exited");
        });

        tracing::info!(interval = ?period, "session validation started");
        Some(ValidationHandle {
            cancel,
            task: Some(task),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{SessionContext, SessionManagerConfig};

    fn config(interval_ms: u64) -> SessionManagerConfig {
        SessionManagerConfig {
            global_timeout: Some(Duration::from_millis(30)),
            validation_interval: Duration::from_millis(interval_ms),
            ..SessionManagerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_validation_spawns_nothing() {
        let manager = Arc::new(SessionManager::new(SessionManagerConfig {
            validation_enabled: false,
            ..SessionManagerConfig::default()
        }));
        assert!(manager.spawn_validation().is_none());
    }

    #[tokio::test]
    async fn test_background_sweep_expires_idle_sessions() {
        let manager = Arc::new(SessionManager::new(config(20)));
        let id = manager.start(&SessionContext::new()).await.unwrap();
        let handle = manager.spawn_validation().unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        // Purged by the sweep, so it is no longer known at all.
        assert_eq!(
            manager.get_session(&id).await.unwrap_err(),
            crate::SessionError::Unknown(id)
        );
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_task_exits_when_manager_dropped() {
        let manager = Arc::new(SessionManager::new(config(10)));
        let handle = manager.spawn_validation().unwrap();
        drop(manager);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let manager = Arc::new(SessionManager::new(config(10_000)));
        let handle = manager.spawn_validation().unwrap();
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }
}
