//! Error types for stat configuration.
//!
//! Stat mutators never fail: out-of-range input is clamped and division by
//! zero is guarded. The errors here all come from building stats out of
//! configuration, where a wrong operator tag or malformed data must be
//! reported instead of silently producing bad arithmetic.

use crate::registry::OperatorKind;
use crate::stat_id::StatId;
use thiserror::Error;

/// Errors that can occur while configuring stats.
///
/// # Examples
///
/// ```rust
/// use modstat::{StatError, StatId};
///
/// let err = StatError::UnknownStat(StatId::from_str("HP"));
/// assert_eq!(err.to_string(), "Unknown stat: HP");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatError {
    /// No operator is bound to the requested tag.
    #[error("No operator registered for kind '{kind}'")]
    OperatorNotRegistered { kind: OperatorKind },

    /// The tag is bound to an operator over a different numeric type.
    #[error("Operator '{kind}' cannot be used for values of type {requested}")]
    OperatorTypeMismatch {
        kind: OperatorKind,
        requested: &'static str,
    },

    /// A descriptor declares a minimum above its maximum.
    #[error("Invalid bounds for stat {stat}: min {min} is greater than max {max}")]
    InvalidBounds {
        stat: StatId,
        min: String,
        max: String,
    },

    /// Two descriptors in the same sheet share a stat id.
    #[error("Duplicate stat: {0}")]
    DuplicateStat(StatId),

    /// A stat id was referenced that the sheet does not contain.
    #[error("Unknown stat: {0}")]
    UnknownStat(StatId),

    /// Configuration data could not be parsed.
    #[error("Invalid stat configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StatError {
    fn from(err: serde_json::Error) -> Self {
        StatError::Config(err.to_string())
    }
}
