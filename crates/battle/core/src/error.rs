//! Common error infrastructure for battle-core.
//!
//! Domain errors (`CommandError`, `DeckError`, `StatusError`, `EngineError`)
//! live next to the code that raises them and implement [`GameError`] so the
//! engine and runtime can classify and log them uniformly.
//!
//! Nothing in this crate treats an error as fatal to the process: the engine
//! entry points log a warning and leave state untouched.

use crate::state::UnitId;

/// Severity level of an error, used for logging and recovery decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; another command may succeed.
    ///
    /// Examples: not enough action points, unit stunned, hand full
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: unknown unit, target on the wrong team
    Validation,

    /// State inconsistency that points at a bug.
    ///
    /// Examples: mask marked equipped but missing from the arena
    Internal,

    /// State can no longer be trusted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Unit that triggered the error (if applicable).
    pub unit: Option<UnitId>,

    /// Round counter at the time of the error.
    pub round: u32,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self {
            unit: None,
            round,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all battle-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not by impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Context captured when the error was raised, if any.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier such as `"COMMAND_TARGET_DEAD"`, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_builder_keeps_every_field() {
        let ctx = ErrorContext::new(4)
            .with_unit(UnitId(2))
            .with_message("mask missing from arena");

        assert_eq!(ctx.round, 4);
        assert_eq!(ctx.unit, Some(UnitId(2)));
        assert_eq!(ctx.message, Some("mask missing from arena"));
    }

    #[test]
    fn only_internal_and_fatal_are_bugs() {
        assert!(!ErrorSeverity::Recoverable.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
    }
}
