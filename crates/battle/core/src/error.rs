//! Common error infrastructure for battle-core.
//!
//! This module provides shared types and traits used across all error types in
//! the battle crates. Domain-specific errors (e.g., `TargetingError`,
//! `CombatantError`) are defined in their respective modules alongside the
//! operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each domain has its own error type with specific variants
//! - **Uniform Taxonomy**: Every error maps onto one [`ErrorKind`]
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **No Retries**: Operations are deterministic, so the same input reproduces the same error

use std::fmt;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The caller may skip the unit or choose another action
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted battle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the turn can continue with a different choice.
    ///
    /// Examples: experience granted to a defeated unit, range clamped
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: negative damage, unknown combatant
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - battle state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Coarse error taxonomy shared by every public battle operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Malformed or missing input (unknown target, negative damage, empty roster).
    Validation,

    /// A precondition on current state was violated (defeat handling on a
    /// living unit, experience for a defeated or non-player unit).
    State,

    /// A requested range exceeds the configured cap.
    Range,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::State => "state",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all battle errors.
///
/// This trait provides a uniform interface for error classification across all
/// error types in the battle crates.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CoreError: fmt::Display + fmt::Debug {
    /// Returns the taxonomy bucket of this error.
    fn kind(&self) -> ErrorKind;

    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Validation => ErrorSeverity::Validation,
            ErrorKind::State | ErrorKind::Range => ErrorSeverity::Recoverable,
        }
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Flat `{success, kind, message}` record of an operation's result.
///
/// Callers that forward results across a boundary (UI, scripting, logs) can
/// collapse any `Result<T, E: CoreError>` into this shape instead of matching
/// on every error enum.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperationStatus {
    pub success: bool,
    pub kind: Option<ErrorKind>,
    pub code: Option<&'static str>,
    pub message: Option<String>,
}

impl OperationStatus {
    pub const fn ok() -> Self {
        Self {
            success: true,
            kind: None,
            code: None,
            message: None,
        }
    }

    pub fn failure<E: CoreError + ?Sized>(error: &E) -> Self {
        Self {
            success: false,
            kind: Some(error.kind()),
            code: Some(error.error_code()),
            message: Some(error.to_string()),
        }
    }

    pub fn from_result<T, E: CoreError>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(error) => Self::failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("negative damage: {0}")]
    struct NegativeDamage(i64);

    impl CoreError for NegativeDamage {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Validation
        }

        fn error_code(&self) -> &'static str {
            "TEST_NEGATIVE_DAMAGE"
        }
    }

    #[test]
    fn status_from_error_carries_kind_and_message() {
        let result: Result<(), _> = Err(NegativeDamage(-3));
        let status = OperationStatus::from_result(&result);

        assert!(!status.success);
        assert_eq!(status.kind, Some(ErrorKind::Validation));
        assert_eq!(status.code, Some("TEST_NEGATIVE_DAMAGE"));
        assert_eq!(status.message.as_deref(), Some("negative damage: -3"));
    }

    #[test]
    fn status_from_ok() {
        let result: Result<u32, NegativeDamage> = Ok(7);
        assert_eq!(OperationStatus::from_result(&result), OperationStatus::ok());
    }

    #[test]
    fn default_severity_follows_kind() {
        assert_eq!(NegativeDamage(-1).severity(), ErrorSeverity::Validation);
    }
}
