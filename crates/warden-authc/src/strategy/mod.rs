//! Multi-realm authentication policies.
//!
//! The authenticator drives a strategy through four hooks per login
//! attempt. Each hook takes the aggregate by value and hands it back inside
//! an [`AttemptFlow`], so a whole attempt is a fold over the realm list:
//!
//! 1. [`AuthenticationStrategy::before_all_attempts`] seeds the aggregate.
//! 2. [`AuthenticationStrategy::before_attempt`] runs before each realm and
//!    may stop the loop.
//! 3. The realm is consulted by the authenticator.
//! 4. [`AuthenticationStrategy::after_attempt`] folds the realm's result
//!    (or error) into the aggregate.
//! 5. [`AuthenticationStrategy::after_all_attempts`] validates the result.

mod all_successful;
mod at_least_one;
mod first_successful;

pub use all_successful::AllSuccessfulStrategy;
pub use at_least_one::AtLeastOneSuccessfulStrategy;
pub use first_successful::FirstSuccessfulStrategy;

use std::fmt;
use std::sync::Arc;

use warden_core::{
    AuthcResult, AuthenticationError, AuthenticationInfo, AuthenticationToken, Realm,
};

/// What the authenticator should do after a hook.
#[derive(Debug)]
pub enum AttemptFlow {
    /// Keep consulting realms with this aggregate.
    Continue(AuthenticationInfo),
    /// Stop consulting realms; this aggregate is the outcome so far.
    Stop(AuthenticationInfo),
    /// Fail the whole attempt.
    Abort(AuthenticationError),
}

/// Combines one realm's result into the running aggregate.
pub trait InfoMerger: Send + Sync + fmt::Debug {
    /// Merge `single` into `aggregate`.
    fn merge(
        &self,
        aggregate: AuthenticationInfo,
        single: AuthenticationInfo,
    ) -> AuthenticationInfo;
}

/// Union merge via [`AuthenticationInfo::merge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMerger;

impl InfoMerger for DefaultMerger {
    fn merge(
        &self,
        aggregate: AuthenticationInfo,
        single: AuthenticationInfo,
    ) -> AuthenticationInfo {
        aggregate.merge(single)
    }
}

/// A policy deciding how per-realm outcomes combine into one login result.
pub trait AuthenticationStrategy: Send + Sync + fmt::Debug {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Merger used by [`AuthenticationStrategy::merge`].
    fn merger(&self) -> &dyn InfoMerger;

    /// Seed the aggregate. `realms` are the realms that support the token.
    ///
    /// # Errors
    ///
    /// Fails fast when the attempt must not proceed.
    fn before_all_attempts(
        &self,
        realms: &[Arc<dyn Realm>],
        token: &AuthenticationToken,
    ) -> AuthcResult<AuthenticationInfo> {
        let _ = (realms, token);
        Ok(AuthenticationInfo::empty())
    }

    /// Runs before `realm` is consulted.
    fn before_attempt(
        &self,
        realm: &dyn Realm,
        token: &AuthenticationToken,
        aggregate: AuthenticationInfo,
    ) -> AttemptFlow {
        let _ = (realm, token);
        AttemptFlow::Continue(aggregate)
    }

    /// Fold the result of consulting `realm` into the aggregate.
    ///
    /// `single` is the realm's account data (`None` if the realm did not
    /// know the principal or failed); `error` is the realm's failure.
    fn after_attempt(
        &self,
        realm: &dyn Realm,
        token: &AuthenticationToken,
        single: Option<AuthenticationInfo>,
        aggregate: AuthenticationInfo,
        error: Option<&AuthenticationError>,
    ) -> AttemptFlow;

    /// Final validation of the aggregate.
    ///
    /// `last_error` is the most recent realm failure, if any.
    ///
    /// # Errors
    ///
    /// Returns `last_error` when no realm succeeded, or
    /// [`AuthenticationError::NoAccount`] when nothing failed but nothing
    /// was found either.
    fn after_all_attempts(
        &self,
        token: &AuthenticationToken,
        aggregate: AuthenticationInfo,
        last_error: Option<AuthenticationError>,
    ) -> AuthcResult<AuthenticationInfo> {
        if !aggregate.is_empty() {
            return Ok(aggregate);
        }
        Err(last_error.unwrap_or_else(|| AuthenticationError::NoAccount {
            principal: token.principal().to_owned(),
        }))
    }

    /// Merge one realm's result into the aggregate.
    fn merge(
        &self,
        single: Option<AuthenticationInfo>,
        aggregate: AuthenticationInfo,
    ) -> AuthenticationInfo {
        match single {
            Some(single) => self.merger().merge(aggregate, single),
            None => aggregate,
        }
    }
}

/// Policy names accepted by [`strategy_from_name`].
pub const STRATEGY_NAMES: [&str; 3] = [
    AllSuccessfulStrategy::NAME,
    AtLeastOneSuccessfulStrategy::NAME,
    FirstSuccessfulStrategy::NAME,
];

/// Build a strategy from its configuration name.
#[must_use]
pub fn strategy_from_name(name: &str) -> Option<Arc<dyn AuthenticationStrategy>> {
    match name {
        AllSuccessfulStrategy::NAME => Some(Arc::new(AllSuccessfulStrategy::new())),
        AtLeastOneSuccessfulStrategy::NAME => Some(Arc::new(AtLeastOneSuccessfulStrategy::new())),
        FirstSuccessfulStrategy::NAME => Some(Arc::new(FirstSuccessfulStrategy::new())),
        _ => None,
    }
}
