//! Session lifecycle notifications.

use crate::session::Session;

/// Notified on session start, stop and expiration.
///
/// Each callback receives a snapshot taken right after the transition.
/// Callbacks run while the session's lock is held and must not call back
/// into the manager for the same session.
pub trait SessionListener: Send + Sync {
    /// A session was created.
    fn on_start(&self, session: &Session) {
        let _ = session;
    }

    /// A session was stopped explicitly.
    fn on_stop(&self, session: &Session) {
        let _ = session;
    }

    /// A session was found past its idle timeout.
    fn on_expiration(&self, session: &Session) {
        let _ = session;
    }
}
