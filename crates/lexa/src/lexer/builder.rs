use crate::automaton::compile::compile;
use crate::automaton::determinize::determinize;
use crate::automaton::minimize::minimize;
use crate::automaton::{Automaton, TokenId};
use crate::error::BuildError;
use crate::lexer::{CompiledLexer, TokenKind};
use compact_str::CompactString;
use smallvec::SmallVec;

/// Progress events reported by [`LexerBuilder::build_with_observer`].
///
/// Purely informational — the hook exists so interactive tooling can show
/// construction progress; it has no effect on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProgress {
    /// A pattern character was consumed while compiling rule `rule`.
    Pattern { rule: usize, position: usize },
    /// A deterministic state was taken off the construction queue;
    /// `states` is the number of states built so far.
    Subset { states: usize },
}

/// One registered token rule: the pattern and the kind its matches get.
pub struct LexRule<K: TokenKind> {
    pub kind: K,
    pub pattern: CompactString,
}

/// Collects token rules and compiles them into a [`CompiledLexer`].
///
/// Registration order is precedence order: when two rules accept the same
/// longest lexeme, the rule registered first wins the tie.
pub struct LexerBuilder<K: TokenKind> {
    rules: SmallVec<[LexRule<K>; 16]>,
}

impl<K: TokenKind> Default for LexerBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TokenKind> LexerBuilder<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: SmallVec::new(),
        }
    }

    /// Registers a token rule.
    #[must_use]
    pub fn token(mut self, kind: K, pattern: &str) -> Self {
        self.rules.push(LexRule {
            kind,
            pattern: CompactString::new(pattern),
        });
        self
    }

    /// Compiles every rule into one shared automaton, determinizes it and
    /// minimizes the result. Intended to be called once at startup; the
    /// returned lexer is immutable and freely shareable across threads.
    ///
    /// # Errors
    ///
    /// Any malformed pattern fails the whole build — a partial grammar is
    /// never produced. [`BuildError::Internal`] reports a defect in the
    /// automaton algorithms themselves, not in the supplied patterns.
    pub fn build(self) -> Result<CompiledLexer<K>, BuildError> {
        self.build_with_observer(&mut |_| {})
    }

    /// Same as [`Self::build`], reporting [`BuildProgress`] events along
    /// the way.
    ///
    /// # Errors
    ///
    /// See [`Self::build`].
    pub fn build_with_observer(
        self,
        observer: &mut dyn FnMut(BuildProgress),
    ) -> Result<CompiledLexer<K>, BuildError> {
        let mut nfa = Automaton::new();
        let start = nfa.start();
        for (index, rule) in self.rules.iter().enumerate() {
            let id = TokenId(u32::try_from(index).unwrap_or(u32::MAX));
            compile(&mut nfa, start, &rule.pattern, id, &mut |position| {
                observer(BuildProgress::Pattern {
                    rule: index,
                    position,
                });
            })
            .map_err(|error| BuildError::MalformedPattern {
                pattern: rule.pattern.clone(),
                position: error.position,
                kind: error.kind,
            })?;
        }

        let dfa = determinize(&nfa, &mut |states| {
            observer(BuildProgress::Subset { states });
        });
        let minimized = minimize(&dfa)?;
        let kinds = self.rules.into_iter().map(|rule| rule.kind).collect();
        Ok(CompiledLexer::new(minimized, kinds))
    }
}
