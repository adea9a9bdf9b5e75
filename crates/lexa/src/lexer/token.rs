use crate::text::TextRange;
use compact_str::CompactString;

/// Classification a lexer rule assigns to the lexemes it matches.
///
/// Implemented on a small copyable enum by the consumer of the lexer.
pub trait TokenKind: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    /// Trivia is matched and measured like any other token but dropped
    /// from the token sequence (typically whitespace).
    fn is_trivia(self) -> bool {
        false
    }
}

/// A token produced by the lexer: its kind, the matched lexeme, and the
/// byte range the lexeme occupied in the source.
///
/// The range is what the downstream parsers use to turn a failure into a
/// line/column diagnostic, so it is carried on every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K: TokenKind> {
    pub kind: K,
    pub text: CompactString,
    pub range: TextRange,
}

impl<K: TokenKind> Token<K> {
    #[must_use]
    pub fn new(kind: K, text: impl Into<CompactString>, range: TextRange) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// Check if this token is trivia (whitespace etc.).
    #[inline]
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}
