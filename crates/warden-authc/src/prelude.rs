//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_authc::prelude::*;` to import all essential types.

pub use crate::{
    AllSuccessfulStrategy, AtLeastOneSuccessfulStrategy, AuthenticationStrategy,
    FirstSuccessfulStrategy, ModularAuthenticator,
};
