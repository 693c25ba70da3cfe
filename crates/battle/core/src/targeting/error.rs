//! Targeting errors.

use crate::error::{CoreError, ErrorKind};

/// Errors raised by the strict targeting entry points.
///
/// The lenient entry points never fail: they clamp ranges and fall back to
/// the radial archetype instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetingError {
    #[error("requested range {requested} exceeds the calculation cap {cap}")]
    RangeExceedsCap { requested: i32, cap: u32 },

    #[error("unknown weapon archetype '{0}'")]
    UnknownArchetype(String),
}

impl CoreError for TargetingError {
    fn kind(&self) -> ErrorKind {
        match self {
            TargetingError::RangeExceedsCap { .. } => ErrorKind::Range,
            TargetingError::UnknownArchetype(_) => ErrorKind::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TargetingError::RangeExceedsCap { .. } => "TARGETING_RANGE_EXCEEDS_CAP",
            TargetingError::UnknownArchetype(_) => "TARGETING_UNKNOWN_ARCHETYPE",
        }
    }
}
