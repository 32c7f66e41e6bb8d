//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_realm::prelude::*;` to import all essential types.

pub use crate::{SimpleAccount, SimpleAccountRealm};
