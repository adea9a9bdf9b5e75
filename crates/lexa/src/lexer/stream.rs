//! Lazy token stream over a borrowed source.
//!
//! [`Tokens`] produces tokens on demand, one longest match at a time, and
//! can be rewound with [`Tokens::restart`]. Trivia kinds are matched and
//! advanced over but never yielded. When no rule matches at a position the
//! stream yields a single [`LexerError`] carrying the stuck offset and
//! then fuses.

use crate::error::{LexerError, LexerErrorKind};
use crate::lexer::{CompiledLexer, Token, TokenKind};
use crate::text::{TextRange, TextSize};

/// Lazy, finite, restartable token sequence. Created by
/// [`CompiledLexer::tokens`].
pub struct Tokens<'s, K: TokenKind> {
    lexer: &'s CompiledLexer<K>,
    source: &'s str,
    offset: usize,
    stuck: bool,
}

impl<'s, K: TokenKind> Tokens<'s, K> {
    pub(crate) fn new(lexer: &'s CompiledLexer<K>, source: &'s str) -> Self {
        Self {
            lexer,
            source,
            offset: 0,
            stuck: false,
        }
    }

    /// Rewinds the stream to the beginning of the source.
    pub fn restart(&mut self) {
        self.offset = 0;
        self.stuck = false;
    }

    /// Current byte offset into the source.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl<K: TokenKind> Iterator for Tokens<'_, K> {
    type Item = Result<Token<K>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stuck || self.offset >= self.source.len() {
                return None;
            }
            let start = self.offset;
            match self.lexer.automaton().search(self.source, start) {
                // A zero-length match cannot advance the stream, so it is
                // reported the same way as no match at all.
                Some(matched) if matched.end > start => {
                    let kind = self.lexer.kind_of(matched.token);
                    self.offset = matched.end;
                    if kind.is_trivia() {
                        continue;
                    }
                    let range = TextRange::at(
                        TextSize::from(u32::try_from(start).unwrap_or(0)),
                        TextSize::from(u32::try_from(matched.end - start).unwrap_or(0)),
                    );
                    return Some(Ok(Token::new(
                        kind,
                        &self.source[start..matched.end],
                        range,
                    )));
                }
                _ => {
                    self.stuck = true;
                    let found = self.source[start..].chars().next().unwrap_or('\0');
                    let span = TextRange::at(
                        TextSize::from(u32::try_from(start).unwrap_or(0)),
                        TextSize::from(u32::try_from(found.len_utf8()).unwrap_or(1)),
                    );
                    return Some(Err(LexerError::new(
                        span,
                        LexerErrorKind::UnrecognizedInput { found },
                    )));
                }
            }
        }
    }
}
