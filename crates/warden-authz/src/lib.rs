//! Warden Authz - Realm-backed authorization.
//!
//! [`ModularRealmAuthorizer`] answers "may this subject do X?" and "does it
//! hold role R?" by asking every configured realm for the subject's
//! [`warden_core::AuthorizationInfo`]. A check passes as soon as any realm
//! grants it. Realm lookups can be memoized in a
//! [`warden_core::Cache`] keyed by realm and primary principal.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod authorizer;

pub use authorizer::{AuthzCacheKey, ModularRealmAuthorizer};
