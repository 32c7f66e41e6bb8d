//! Per-operation span for logins and logouts.

use uuid::Uuid;

/// Identifies one security operation in the logs.
///
/// Every line logged inside [`OperationContext::span`] carries the
/// operation name, a fresh operation id and, once known, the principal and
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    operation_id: Uuid,
    operation: &'static str,
    principal: Option<String>,
    session_id: Option<Uuid>,
}

impl OperationContext {
    /// Context for a new `operation` (`"login"`, `"logout"`).
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation_id: Uuid::new_v4(),
            operation,
            principal: None,
            session_id: None,
        }
    }

    /// Record the principal the operation acts for.
    #[must_use]
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Record the session the operation acts on.
    #[must_use]
    pub fn with_session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Operation id.
    #[must_use]
    pub fn operation_id(&self) -> Uuid {
        self.operation_id
    }

    /// Operation name.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Span to instrument the operation's future with.
    ///
    /// Attach it with `tracing::Instrument::instrument`; entering it by
    /// guard across an `.await` would mis-attribute other tasks' events.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "warden.operation",
            operation = self.operation,
            operation_id = %self.operation_id,
            principal = self.principal.as_deref(),
            session_id = self.session_id.map(|id| id.to_string()),
        )
    }
}
