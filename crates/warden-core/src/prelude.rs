//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuthcResult, AuthenticationError, AuthorizationError, AuthzResult};

// Tokens and account data
pub use crate::{
    AuthenticationInfo, AuthenticationToken, AuthorizationInfo, Principal, PrincipalCollection,
    TokenKind,
};

// Boundaries
pub use crate::{AuthenticationListener, Cache, Clock, MemoryCache, Realm, SystemClock};
