//! Prelude module - commonly used test helpers.
//!
//! Use `use warden_test::prelude::*;` to import all essential helpers.

pub use crate::fixtures::{
    init_test_logging, test_authorization, test_info, test_stored_password, test_token,
    test_token_for,
};
pub use crate::mocks::{AuthEvent, MockOutcome, MockRealm, RecordingAuthListener};
