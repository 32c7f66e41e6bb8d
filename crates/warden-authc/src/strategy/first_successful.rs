use std::sync::Arc;

use warden_core::{AuthenticationError, AuthenticationInfo, AuthenticationToken, Realm};

use super::{AttemptFlow, AuthenticationStrategy, DefaultMerger, InfoMerger};

/// Only the first realm that authenticates the token counts.
///
/// Once the aggregate holds a result, [`AuthenticationStrategy::before_attempt`]
/// stops the loop so later realms are never consulted. Failures before the
/// first success are swallowed as in [`super::AtLeastOneSuccessfulStrategy`].
#[derive(Debug, Clone)]
pub struct FirstSuccessfulStrategy {
    merger: Arc<dyn InfoMerger>,
}

impl FirstSuccessfulStrategy {
    /// Configuration name.
    pub const NAME: &'static str = "first_successful";

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

impl Default for FirstSuccessfulStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationStrategy for FirstSuccessfulStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn merger(&self) -> &dyn InfoMerger {
        self.merger.as_ref()
    }

    fn before_attempt(
        &self,
        realm: &dyn Realm,
        _token: &AuthenticationToken,
        aggregate: AuthenticationInfo,
    ) -> AttemptFlow {
        if aggregate.is_empty() {
            AttemptFlow::Continue(aggregate)
        } else {
            tracing::debug!(
                realm = realm.name(),
                "already authenticated, skipping remaining realms"
            );
            AttemptFlow::Stop(aggregate)
        }
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
        if aggregate.is_empty() {
            AttemptFlow::Continue(self.merge(single, aggregate))
        } else {
            AttemptFlow::Continue(aggregate)
        }
    }
}
