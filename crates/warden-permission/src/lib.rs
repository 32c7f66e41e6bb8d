//! Warden Permission - Wildcard permission parsing and implication.
//!
//! This crate provides:
//! - The [`Permission`] trait (asymmetric implication between grants)
//! - [`WildcardPermission`]: `domain:action:instance` strings with `*` and
//!   comma-separated unions
//! - [`AllPermission`] for administrative grants
//! - Resolvers turning strings and role names into permissions
//!
//! Everything here is pure and stateless; no I/O, no locking.
//!
//! # Example
//!
//! ```
//! use warden_permission::{Permission, WildcardPermission};
//!
//! let granted = WildcardPermission::parse("printer:print,query:lp7200").unwrap();
//! let required = WildcardPermission::parse("printer:print:lp7200").unwrap();
//! assert!(granted.implies(&required));
//!
//! let admin = WildcardPermission::parse("*").unwrap();
//! assert!(admin.implies(&required));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod permission;
mod resolver;
mod wildcard;

pub use error::{PermissionError, PermissionResult};
pub use permission::{AllPermission, Permission};
pub use resolver::{
    PermissionResolver, RolePermissionResolver, StaticRolePermissionResolver,
    WildcardPermissionResolver,
};
pub use wildcard::{PART_DIVIDER, SUBPART_DIVIDER, WILDCARD_TOKEN, WildcardPermission};
