//! # Lexa
//!
//! A regular-expression-to-automaton compiler and longest-match tokenizer:
//! the lexing core of a template-language code generator.
//!
//! ## Overview
//!
//! Token rules are plain patterns (`|` alternation, `(...)` grouping, `+`
//! repetition, `\` escapes, literal characters). The build pipeline folds
//! every rule into one shared nondeterministic automaton, determinizes it
//! by subset construction, and minimizes the result by partition
//! refinement — all exactly once, at startup. Scanning then walks the
//! minimized automaton with deterministic longest-match semantics:
//!
//! - the longest matching lexeme at a position wins;
//! - among rules matching the same longest lexeme, the rule registered
//!   first wins;
//! - progress into a branch that later dead-ends never discards an
//!   earlier valid match.
//!
//! ## Quick Start
//!
//! ```rust
//! use lexa::{LexerBuilder, TokenKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Kind {
//!     If,
//!     Word,
//!     Number,
//!     Space,
//! }
//!
//! impl TokenKind for Kind {
//!     fn is_trivia(self) -> bool {
//!         matches!(self, Kind::Space)
//!     }
//! }
//!
//! // Registration order is precedence order: `if` outranks `Word` for
//! // the same lexeme, while longer words still lex as `Word`.
//! let lexer = LexerBuilder::new()
//!     .token(Kind::If, "if")
//!     .token(Kind::Word, "(a|b|f|i)+")
//!     .token(Kind::Number, "(0|1|2)+")
//!     .token(Kind::Space, " +")
//!     .build()?;
//!
//! let tokens = lexer.tokenize("if abba 102")?;
//! assert_eq!(
//!     tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
//!     vec![Kind::If, Kind::Word, Kind::Number],
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Concurrency
//!
//! A [`CompiledLexer`] is immutable after `build` returns: it is `Send +
//! Sync` and is meant to be shared (for example in an `Arc`) across any
//! number of concurrent scans. Each scan allocates only call-local state,
//! so no locking is involved anywhere on the read path.
//!
//! ## Errors
//!
//! Construction fails with [`BuildError::MalformedPattern`] on a
//! structurally invalid pattern and never produces a partial grammar.
//! Scanning reports [`LexerError`] with the byte offset where no rule
//! matched. Defects in the automaton algorithms themselves surface as
//! [`BuildError::Internal`], distinguishable from both.
//!
//! ## Modules
//!
//! - [`lexer`] - rule registration, compiled lexer, token streams
//! - [`error`] - error types
//! - [`text`] - byte-offset positional types
//! - [`template`] - the template definition language's token grammar

mod automaton;
pub mod error;
pub mod lexer;
pub mod template;
pub mod text;

pub use error::{BuildError, LexerError, LexerErrorKind, PatternErrorKind};
pub use lexer::{
    BuildProgress, CompiledLexer, LexRule, LexerBuilder, Token, TokenKind, Tokens,
};
pub use text::{TextRange, TextSize};
