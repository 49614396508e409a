//! Unified error type for the MathRush service.

use mathrush_match::MatchError;
use mathrush_session::SessionError;
use mathrush_store::StoreError;

/// Top-level error every service operation returns.
///
/// Component errors are sorted into the categories callers act on: a
/// missing entity, a state rule that refused the operation, or malformed
/// input. Store failures are carried through untouched.
#[derive(Debug, thiserror::Error)]
pub enum MathRushError {
    /// A referenced player or game does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The target exists but its current state forbids the operation.
    #[error("{0}")]
    BusinessRuleViolation(String),

    /// The caller sent something malformed. Raised before any store access.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service was configured with values it can't honor.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<MatchError> for MathRushError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::PlayerNotFound(_) | MatchError::GameNotFound(_) => {
                MathRushError::NotFound(err.to_string())
            }
            MatchError::Transition(rule) => MathRushError::BusinessRuleViolation(rule.to_string()),
            MatchError::Store(source) => MathRushError::Store(source),
            MatchError::InvalidConfig(message) => MathRushError::Config(message),
        }
    }
}

impl From<SessionError> for MathRushError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => MathRushError::NotFound(err.to_string()),
            SessionError::AlreadyAbandoned(_) => {
                MathRushError::BusinessRuleViolation(err.to_string())
            }
            SessionError::Store(source) => MathRushError::Store(source),
        }
    }
}
