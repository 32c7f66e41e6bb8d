//! Warden Core - Shared data model and collaborator boundaries.
//!
//! This crate provides:
//! - [`AuthenticationToken`] and [`TokenKind`]: what a caller submits at login
//! - [`Principal`] / [`PrincipalCollection`]: realm-tagged identity claims
//! - [`AuthenticationInfo`] / [`AuthorizationInfo`]: account data with a
//!   pure union `merge`
//! - The [`Realm`] and [`Cache`] boundaries, plus [`MemoryCache`]
//! - [`AuthenticationListener`] for login/logout notifications
//! - [`Clock`] with [`SystemClock`] and [`ManualClock`]
//! - The authentication and authorization error taxonomy

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod cache;
mod clock;
mod error;
mod info;
mod listener;
mod principal;
mod realm;
mod token;

pub use cache::{Cache, MemoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthcResult, AuthenticationError, AuthorizationError, AuthzResult};
pub use info::{AuthenticationInfo, AuthorizationInfo};
pub use listener::AuthenticationListener;
pub use principal::{Principal, PrincipalCollection};
pub use realm::Realm;
pub use token::{AuthenticationToken, TokenKind};
