//! Warden Realm - In-memory account realm.
//!
//! [`SimpleAccountRealm`] implements the [`warden_core::Realm`] boundary
//! over in-memory account and role tables. It verifies credentials with a
//! pluggable [`warden_crypto::CredentialsMatcher`], honours locked and
//! credentials-expired flags, and can refuse logins after a number of
//! consecutive failures.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod account;
mod simple;

pub use account::SimpleAccount;
pub use simple::SimpleAccountRealm;
