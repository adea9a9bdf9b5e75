//! # Error Types
//!
//! The error taxonomy keeps three situations apart:
//!
//! - [`BuildError::MalformedPattern`]: a token's defining pattern is
//!   structurally invalid. Fatal to startup; the grammar is never served
//!   partially.
//! - [`LexerError`] with [`LexerErrorKind::UnrecognizedInput`]: no rule
//!   matches at some input position during scanning. Recoverable by the
//!   caller, typically surfaced as a source-position diagnostic.
//! - [`BuildError::Internal`]: an automaton-algorithm invariant was
//!   violated. A defect in this crate, distinguishable from both of the
//!   above so callers never conflate a bad grammar with a bug here.
//!
//! With the `diagnostics` feature enabled, errors derive [`miette`]
//! diagnostics with labeled source spans.

use crate::text::TextRange;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Error raised while compiling the token grammar into an automaton.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum BuildError {
    #[error("malformed pattern `{pattern}` at position {position}: {kind}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexa::malformed_pattern)))]
    MalformedPattern {
        /// The offending pattern, verbatim.
        pattern: CompactString,
        /// Character position of the defect within the pattern.
        position: usize,
        kind: PatternErrorKind,
    },

    #[error("automaton invariant violated: {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexa::internal)))]
    Internal { reason: &'static str },
}

/// Structural defects a pattern can have.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PatternErrorKind {
    #[error("unbalanced closing parenthesis")]
    UnbalancedParen,

    #[error("trailing escape")]
    TrailingEscape,
}

/// Pattern defect before it is attributed to a rule; the builder wraps it
/// into [`BuildError::MalformedPattern`] with the pattern text attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatternError {
    pub(crate) position: usize,
    pub(crate) kind: PatternErrorKind,
}

impl PatternError {
    pub(crate) const fn new(position: usize, kind: PatternErrorKind) -> Self {
        Self { position, kind }
    }
}

/// Scanning error with location information
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
#[error("{kind}")]
pub struct LexerError {
    #[cfg_attr(feature = "diagnostics", label)]
    pub span: TextRange,
    #[source]
    pub kind: LexerErrorKind,
}

/// Types of scanning errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerErrorKind {
    #[error("no token matches at this position (found {found:?})")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexa::unrecognized_input)))]
    UnrecognizedInput { found: char },
}

impl LexerError {
    /// Create a new lexer error
    #[must_use]
    pub const fn new(span: TextRange, kind: LexerErrorKind) -> Self {
        Self { span, kind }
    }

    /// Get the span (location) of this error
    #[must_use]
    pub const fn span(&self) -> TextRange {
        self.span
    }

    /// Byte offset of the position where scanning got stuck.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start().into() as usize
    }

    /// Get the kind of lexer error
    #[must_use]
    pub const fn kind(&self) -> &LexerErrorKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextSize;

    #[test]
    fn test_build_error_display() {
        let error = BuildError::MalformedPattern {
            pattern: CompactString::new("a)b"),
            position: 1,
            kind: PatternErrorKind::UnbalancedParen,
        };
        let message = format!("{error}");
        assert!(message.contains("a)b"));
        assert!(message.contains("position 1"));
        assert!(message.contains("unbalanced closing parenthesis"));
    }

    #[test]
    fn test_internal_error_is_distinct() {
        let internal = BuildError::Internal { reason: "partition" };
        let malformed = BuildError::MalformedPattern {
            pattern: CompactString::new("\\"),
            position: 0,
            kind: PatternErrorKind::TrailingEscape,
        };
        assert_ne!(internal, malformed);
        assert!(format!("{internal}").contains("invariant"));
    }

    #[test]
    fn test_lexer_error_offset() {
        let error = LexerError::new(
            TextRange::at(TextSize::from(7), TextSize::from(1)),
            LexerErrorKind::UnrecognizedInput { found: '#' },
        );
        assert_eq!(error.offset(), 7);
        assert!(format!("{error}").contains('#'));
    }
}
