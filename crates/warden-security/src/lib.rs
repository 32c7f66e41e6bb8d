//! Warden Security - The security manager facade.
//!
//! This crate ties the engines together:
//! - [`SecurityManager`]: login (authenticate, then open a session), logout
//!   and session resumption
//! - [`Subject`]: the logged-in user, passed explicitly, with permission and
//!   role checks and session attribute access
//! - [`SecurityManagerBuilder`]: assembly from parts or from a loaded
//!   `warden_config::Config`
//! - [`config_bridge`]: conversion of config sections into domain types
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_core::{AuthenticationToken, AuthorizationInfo};
//! use warden_security::SecurityManagerBuilder;
//! use warden_test::MockRealm;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), warden_security::WardenError> {
//! let realm = MockRealm::new("db")
//!     .succeeding("alice")
//!     .with_authorization(AuthorizationInfo::new().with_permission("printer:print"));
//! let manager = SecurityManagerBuilder::new()
//!     .with_realm(Arc::new(realm))
//!     .build()?;
//!
//! let subject = manager
//!     .login(&AuthenticationToken::username_password("alice", "secret"))
//!     .await?;
//! assert!(subject.is_permitted("printer:print:lp7200").await?);
//! subject.logout().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config_bridge;
pub mod prelude;

mod builder;
mod error;
mod eviction;
mod manager;
mod subject;

pub use builder::SecurityManagerBuilder;
pub use error::{WardenError, WardenResult};
pub use manager::{
    PRINCIPALS_ATTRIBUTE, REMEMBER_ME_ATTRIBUTE, RESERVED_ATTRIBUTE_PREFIX, SecurityManager,
};
pub use subject::Subject;
