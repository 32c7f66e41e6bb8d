//! Warden Session - Session lifecycle management.
//!
//! This crate provides:
//! - [`SessionManager`]: the sole authority over session state, with
//!   per-session locking, lazy expiry on access and periodic validation
//! - [`Session`], [`SessionId`] and [`SessionState`]
//! - [`is_expired`], the one idle-timeout predicate shared by the lazy and
//!   periodic paths
//! - The [`SessionDao`] storage boundary with [`MemorySessionDao`]
//! - [`SessionListener`] for start/stop/expiration notifications
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden_session::{SessionContext, SessionManager, SessionManagerConfig};
//!
//! # async fn example() -> Result<(), warden_session::SessionError> {
//! let manager = Arc::new(SessionManager::new(SessionManagerConfig::default()));
//! let _sweeper = manager.spawn_validation();
//!
//! let id = manager.start(&SessionContext::new().with_host("10.0.0.7")).await?;
//! manager.set_attribute(&id, "theme", serde_json::json!("dark")).await?;
//! manager.touch(&id).await?;
//! manager.stop(&id).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config;
mod dao;
mod error;
mod listener;
mod manager;
mod session;
mod validation;

pub use config::{
    DEFAULT_GLOBAL_TIMEOUT, DEFAULT_VALIDATION_INTERVAL, SessionContext, SessionManagerConfig,
};
pub use dao::{MemorySessionDao, SessionDao};
pub use error::{SessionError, SessionResult};
pub use listener::SessionListener;
pub use manager::{SessionManager, ValidationReport};
pub use session::{Session, SessionId, SessionState, is_expired};
pub use validation::ValidationHandle;
