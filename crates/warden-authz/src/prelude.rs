//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_authz::prelude::*;` to import all essential types.

pub use crate::{AuthzCacheKey, ModularRealmAuthorizer};
