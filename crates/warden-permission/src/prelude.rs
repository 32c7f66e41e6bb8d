//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_permission::prelude::*;` to import all essential types.

// Errors
pub use crate::{PermissionError, PermissionResult};

// Permission types
pub use crate::{AllPermission, Permission, WildcardPermission};

// Resolvers
pub use crate::{PermissionResolver, RolePermissionResolver, WildcardPermissionResolver};
