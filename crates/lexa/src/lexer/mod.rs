//! # Lexer Module
//!
//! The public lexing surface: rule registration, the compiled automaton
//! handle, and token streams.
//!
//! ## Overview
//!
//! A [`LexerBuilder`] collects `(kind, pattern)` rules and compiles them —
//! once, at startup — into a [`CompiledLexer`]: a minimized deterministic
//! automaton plus the table mapping rule ids back to kinds. The compiled
//! lexer is immutable; any number of scans may share it concurrently
//! without locking, and each scan allocates only call-local state.
//!
//! Matching is deterministic longest-match: at every position the longest
//! matching lexeme wins, and among rules matching the same longest lexeme
//! the rule registered first wins.
//!
//! ## Usage
//!
//! ```rust
//! use lexa::{LexerBuilder, TokenKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     Word,
//!     Space,
//! }
//!
//! impl TokenKind for Kind {
//!     fn is_trivia(self) -> bool {
//!         matches!(self, Kind::Space)
//!     }
//! }
//!
//! let lexer = LexerBuilder::new()
//!     .token(Kind::Word, "(a|b|c)+")
//!     .token(Kind::Space, " +")
//!     .build()?;
//!
//! let tokens = lexer.tokenize("abc cab")?;
//! assert_eq!(tokens.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod stream;
pub mod token;

pub use builder::{BuildProgress, LexRule, LexerBuilder};
pub use stream::Tokens;
pub use token::{Token, TokenKind};

use crate::automaton::{Automaton, TokenId};
use crate::error::LexerError;

/// An immutable tokenizer: the minimized deterministic automaton for a
/// whole token grammar, built exactly once by [`LexerBuilder::build`].
#[derive(Debug)]
pub struct CompiledLexer<K: TokenKind> {
    automaton: Automaton,
    kinds: Vec<K>,
}

impl<K: TokenKind> CompiledLexer<K> {
    pub(crate) fn new(automaton: Automaton, kinds: Vec<K>) -> Self {
        Self { automaton, kinds }
    }

    /// Longest match at the byte offset `start`, with registration order
    /// breaking ties. `None` when no rule matches there.
    #[must_use]
    pub fn scan<'s>(&self, source: &'s str, start: usize) -> Option<(K, &'s str)> {
        let matched = self.automaton.search(source, start)?;
        Some((
            self.kinds[matched.token.index()],
            &source[start..matched.end],
        ))
    }

    /// Lazy token sequence over `source`. Trivia kinds are dropped; see
    /// [`Tokens`].
    #[must_use]
    pub fn tokens<'s>(&'s self, source: &'s str) -> Tokens<'s, K> {
        Tokens::new(self, source)
    }

    /// Tokenizes the whole source eagerly.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexerError`] if some position before the end of
    /// input matches no rule.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token<K>>, LexerError> {
        self.tokens(source).collect()
    }

    /// Number of states in the minimized automaton.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.automaton.len()
    }

    pub(crate) fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub(crate) fn kind_of(&self, token: TokenId) -> K {
        self.kinds[token.index()]
    }
}
