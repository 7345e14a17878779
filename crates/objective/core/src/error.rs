//! Error infrastructure for the objective scheduler.
//!
//! Nothing in this crate is fatal to the tick loop. Errors are either
//! absorbed where they happen or surfaced as non-blocking diagnostics through
//! [`report`], which picks a log level from the error's [`ErrorSeverity`].
//!
//! # Design Principles
//!
//! - **Type Safety**: world mutations and manager queries have their own error types
//! - **Severity Classification**: errors are categorized so callers know whether to retry
//! - **Never blocking**: display-facing queries log and fall back to neutral values

use crate::handle::ObjectiveHandle;
use crate::ids::{CharacterId, FacetId, TargetId};

/// Severity level of an error, used for categorization and log routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Temporary world condition; the next tick may behave differently.
    ///
    /// Examples: target vanished, target claimed by another character
    Recoverable,

    /// The caller asked for something that does not exist or is not allowed.
    ///
    /// Examples: stale objective handle, unknown facet
    Validation,

    /// Unexpected state inconsistency inside an objective.
    ///
    /// Examples: an objective reported a non-finite priority
    Internal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in an objective implementation.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all scheduler errors.
pub trait SchedulerError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors raised by the mutation surface of a [`crate::TargetIndex`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// The target is no longer present in the index.
    #[error("{0} not found in target index")]
    NotFound(TargetId),

    /// The target exists but has no facet at the requested index.
    #[error("{target} has no facet {facet:?}")]
    FacetNotFound { target: TargetId, facet: FacetId },

    /// Another character holds the claim on this target.
    #[error("{target} is claimed by {holder}")]
    ClaimedByOther {
        target: TargetId,
        holder: CharacterId,
    },
}

impl SchedulerError for TargetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) | Self::ClaimedByOther { .. } => ErrorSeverity::Recoverable,
            Self::FacetNotFound { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TARGET_NOT_FOUND",
            Self::FacetNotFound { .. } => "TARGET_FACET_NOT_FOUND",
            Self::ClaimedByOther { .. } => "TARGET_CLAIMED_BY_OTHER",
        }
    }
}

/// Errors raised by [`crate::ObjectiveManager`] queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ObjectiveError {
    /// The handle does not resolve to a live objective of this manager.
    #[error("{character} has no live objective for {handle:?}")]
    UnknownObjective {
        character: CharacterId,
        handle: ObjectiveHandle,
    },

    /// Descriptive data was requested before any objective was selected.
    #[error("{character} has not selected an objective yet")]
    NothingSelected { character: CharacterId },

    /// An objective produced a priority that cannot take part in arbitration.
    #[error("{objective} for {character} reported non-finite priority")]
    InvalidPriority {
        character: CharacterId,
        objective: &'static str,
    },
}

impl SchedulerError for ObjectiveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownObjective { .. } | Self::NothingSelected { .. } => {
                ErrorSeverity::Validation
            }
            Self::InvalidPriority { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownObjective { .. } => "OBJECTIVE_UNKNOWN",
            Self::NothingSelected { .. } => "OBJECTIVE_NOTHING_SELECTED",
            Self::InvalidPriority { .. } => "OBJECTIVE_INVALID_PRIORITY",
        }
    }
}

/// Emits a non-blocking diagnostic for `err` at a level matching its severity.
pub fn report<E: SchedulerError>(err: &E) {
    let severity = err.severity();
    match severity {
        ErrorSeverity::Recoverable => {
            tracing::debug!(code = err.error_code(), %severity, "{}", err)
        }
        ErrorSeverity::Validation => {
            tracing::warn!(code = err.error_code(), %severity, "{}", err)
        }
        ErrorSeverity::Internal => {
            tracing::error!(code = err.error_code(), %severity, "{}", err)
        }
    }
}
