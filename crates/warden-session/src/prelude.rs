//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_session::prelude::*;` to import all essential types.

// Errors
pub use crate::{SessionError, SessionResult};

// Sessions
pub use crate::{
    Session, SessionContext, SessionId, SessionManager, SessionManagerConfig, SessionState,
};

// Boundaries
pub use crate::{MemorySessionDao, SessionDao, SessionListener};
