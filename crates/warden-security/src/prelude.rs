//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_security::prelude::*;` to import the facade along with
//! the token and principal types needed to call it.

// Errors
pub use crate::{WardenError, WardenResult};

// Facade
pub use crate::{SecurityManager, SecurityManagerBuilder, Subject};

// Inputs and outputs
pub use warden_core::{AuthenticationToken, Principal, PrincipalCollection, TokenKind};
pub use warden_session::SessionId;
