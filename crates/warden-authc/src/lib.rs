//! Warden Authc - Multi-realm authentication.
//!
//! This crate provides:
//! - [`ModularAuthenticator`]: consults realms for a login attempt,
//!   notifies [`warden_core::AuthenticationListener`]s and honours
//!   cooperative cancellation between realms
//! - The [`AuthenticationStrategy`] state machine with three policies:
//!   [`AllSuccessfulStrategy`], [`AtLeastOneSuccessfulStrategy`] and
//!   [`FirstSuccessfulStrategy`]
//! - [`InfoMerger`] for custom aggregation of per-realm results
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_authc::{FirstSuccessfulStrategy, ModularAuthenticator};
//! use warden_core::AuthenticationToken;
//!
//! let authc = ModularAuthenticator::new(vec![ldap, database])
//!     .with_strategy(Arc::new(FirstSuccessfulStrategy::new()));
//!
//! let info = authc
//!     .authenticate(&AuthenticationToken::username_password("alice", "s3cret"))
//!     .await?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod authenticator;
mod strategy;

pub use authenticator::ModularAuthenticator;
pub use strategy::{
    AllSuccessfulStrategy, AtLeastOneSuccessfulStrategy, AttemptFlow, AuthenticationStrategy,
    DefaultMerger, FirstSuccessfulStrategy, InfoMerger, STRATEGY_NAMES, strategy_from_name,
};
pub use tokio_util::sync::CancellationToken;
