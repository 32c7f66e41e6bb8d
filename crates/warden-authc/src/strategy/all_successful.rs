use std::sync::Arc;

use warden_core::{AuthenticationError, AuthenticationInfo, AuthenticationToken, Realm};

use super::{AttemptFlow, AuthenticationStrategy, DefaultMerger, InfoMerger};

/// Every realm that supports the token must authenticate it.
///
/// The first realm error aborts the attempt with that error; a realm that
/// does not know the principal aborts with
/// [`AuthenticationError::UnknownAccount`].
#[derive(Debug, Clone)]
pub struct AllSuccessfulStrategy {
    merger: Arc<dyn InfoMerger>,
}

impl AllSuccessfulStrategy {
    /// Configuration name.
    pub const NAME: &'static str = "all_successful";

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

impl Default for AllSuccessfulStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationStrategy for AllSuccessfulStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn merger(&self) -> &dyn InfoMerger {
        self.merger.as_ref()
    }

    fn after_attempt(
        &self,
        realm: &dyn Realm,
        token: &AuthenticationToken,
        single: Option<AuthenticationInfo>,
        aggregate: AuthenticationInfo,
        error: Option<&AuthenticationError>,
    ) -> AttemptFlow {
        if let Some(error) = error {
            tracing::debug!(realm = realm.name(), %error, "realm failed, aborting attempt");
            return AttemptFlow::Abort(error.clone());
        }
        match single {
            Some(single) if !single.is_empty() => {
                AttemptFlow::Continue(self.merge(Some(single), aggregate))
            },
            _ => {
                tracing::debug!(realm = realm.name(), "realm found no account, aborting attempt");
                AttemptFlow::Abort(AuthenticationError::UnknownAccount {
                    principal: token.principal().to_owned(),
                })
            },
        }
    }
}
