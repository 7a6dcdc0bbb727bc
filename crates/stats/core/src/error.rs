//! Error types for stats-core.
//!
//! The runtime API is deliberately lenient: unknown stats read as zero and
//! writes to them are no-ops. Errors only surface on construction paths
//! (base tables, save restore) where bad input would otherwise poison every
//! later computation.

use crate::kind::{ResourceKind, StatKind};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown stat name in a table, NaN base value
    Validation,

    /// Persisted data that cannot be turned back into a consistent character.
    Corrupted,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Corrupted => "corrupted",
        }
    }
}

/// Errors raised while building or restoring stat state.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// A stat name did not match any [`StatKind`].
    #[error("unknown stat '{0}'")]
    UnknownStat(String),

    /// A base value was NaN or infinite.
    #[error("stat {stat} has non-finite base value {value}")]
    NonFiniteValue { stat: StatKind, value: f32 },

    /// A saved resource value was NaN or infinite.
    #[error("resource {resource} has non-finite value {value}")]
    NonFiniteResource { resource: ResourceKind, value: f32 },
}

impl StatsError {
    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStat(_) | Self::NonFiniteValue { .. } => ErrorSeverity::Validation,
            Self::NonFiniteResource { .. } => ErrorSeverity::Corrupted,
        }
    }

    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStat(_) => "UNKNOWN_STAT",
            Self::NonFiniteValue { .. } => "NON_FINITE_VALUE",
            Self::NonFiniteResource { .. } => "NON_FINITE_RESOURCE",
        }
    }
}
