//! Session persistence boundary and the in-memory store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{SessionError, SessionResult};
use crate::session::{Session, SessionId};

/// Storage for session records.
///
/// The manager serializes access per session id, so implementations only
/// need to be safe for concurrent access to different ids.
#[async_trait]
pub trait SessionDao: Send + Sync {
    /// Store a new session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the id already exists or the store fails.
    async fn create(&self, session: &Session) -> SessionResult<()>;

    /// Load a session by id.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the store fails.
    async fn read(&self, id: &SessionId) -> SessionResult<Option<Session>>;

    /// Replace a stored session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Unknown`] if it was never created.
    async fn update(&self, session: &Session) -> SessionResult<()>;

    /// Remove a session. Removing an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the store fails.
    async fn delete(&self, id: &SessionId) -> SessionResult<()>;

    /// Every stored session, including stopped and expired ones.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] if the store fails.
    async fn sessions(&self) -> SessionResult<Vec<Session>>;
}

/// Session store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemorySessionDao {
    sessions: DashMap<SessionId, Session>,
}

impl MemorySessionDao {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionDao for MemorySessionDao {
    async fn create(&self, session: &Session) -> SessionResult<()> {
        match self.sessions.entry(session.id()) {
            Entry::Occupied(_) => Err(SessionError::Storage(format!(
                "session {} already exists",
                session.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(())
            },
        }
    }

    async fn read(&self, id: &SessionId) -> SessionResult<Option<Session>> {
        Ok(self.sessions.get(id).map(|s| s.value().clone()))
    }

    async fn update(&self, session: &Session) -> SessionResult<()> {
        match self.sessions.get_mut(&session.id()) {
            Some(mut stored) => {
                *stored = session.clone();
                Ok(())
            },
            None => Err(SessionError::Unknown(session.id())),
        }
    }

    async fn delete(&self, id: &SessionId) -> SessionResult<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn sessions(&self) -> SessionResult<Vec<Session>> {
        Ok(self.sessions.iter().map(|s| s.value().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_crud() {
        let dao = MemorySessionDao::new();
        let mut session = Session::new(Utc::now(), None, None);
        dao.create(&session).await.unwrap();
        assert!(dao.create(&session).await.is_err());

        session.touch(Utc::now());
        dao.update(&session).await.unwrap();
        assert_eq!(dao.read(&session.id()).await.unwrap().unwrap(), session);
        assert_eq!(dao.sessions().await.unwrap().len(), 1);

        dao.delete(&session.id()).await.unwrap();
        dao.delete(&session.id()).await.unwrap();
        assert!(dao.read(&session.id()).await.unwrap().is_none());
        assert!(dao.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown() {
        let dao = MemorySessionDao::new();
        let session = Session::new(Utc::now(), None, None);
        let err = dao.update(&session).await.unwrap_err();
        assert_eq!(err, SessionError::Unknown(session.id()));
    }
}
