use std::sync::Arc;

use warden_core::{AuthenticationError, AuthenticationInfo, AuthenticationToken, Realm};

use super::{AttemptFlow, AuthenticationStrategy, DefaultMerger, InfoMerger};

/// At least one realm must authenticate the token.
///
/// Realm failures are logged and swallowed; every realm is consulted and
/// all successful results are merged. If none succeeds the last realm error
/// is raised.
#[derive(Debug, Clone)]
pub struct AtLeastOneSuccessfulStrategy {
    merger: Arc<dyn InfoMerger>,
}

impl AtLeastOneSuccessfulStrategy {
    /// Configuration name.
    pub const NAME: &'static str = "at_least_one_successful";

    /// Strategy using the union merge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            merger: Arc::new(DefaultMerger),
        }
    }

    /// Use a custom merge.
    #[must_use]
    pub fn with_merger(mut self, merger: Arc<dyn InfoMerger>) -> Self {
        self.merger = merger;
        self
    }
}

impl Default for AtLeastOneSuccessfulStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationStrategy for AtLeastOneSuccessfulStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn merger(&self) -> &dyn InfoMerger {
        self.merger.as_ref()
    }

    fn after_attempt(
        &self,
        realm: &dyn Realm,
        _token: &AuthenticationToken,
        single: Option<AuthenticationInfo>,
        aggregate: AuthenticationInfo,
        error: Option<&AuthenticationError>,
    ) -> AttemptFlow {
        if let Some(error) = error {
            tracing::info!(realm = realm.name(), %error, "realm failed, trying remaining realms");
        }
        AttemptFlow::Continue(self.merge(single, aggregate))
    }
}
