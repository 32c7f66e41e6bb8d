//! Warden Test - Shared test utilities for the warden crates.
//!
//! This crate provides mock implementations and test helpers that can be
//! used across multiple warden crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! warden-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use warden_test::{MockRealm, test_token};
//!     use warden_core::Realm;
//!
//!     #[tokio::test]
//!     async fn test_realm_is_consulted() {
//!         let realm = MockRealm::new("ldap").succeeding("alice");
//!         let info = realm.authentication_info(&test_token()).await.unwrap();
//!
//!         assert!(info.is_some());
//!         assert_eq!(realm.authc_calls(), 1);
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
