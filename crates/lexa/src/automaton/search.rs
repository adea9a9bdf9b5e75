//! Longest-match frontier search.
//!
//! Correct on any automaton form — the raw nondeterministic graph, the
//! determinized graph, or the minimized one — because it always walks the
//! epsilon closure of the active frontier. On a deterministic automaton
//! the closure degenerates to a single state and the walk becomes a plain
//! table lookup per character.

use super::{Automaton, StateId, TokenId};
use smallvec::SmallVec;

/// A successful match: the winning token and the end byte offset
/// (exclusive) within the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match {
    pub(crate) token: TokenId,
    pub(crate) end: usize,
}

impl Automaton {
    /// Scans `text` from the byte offset `start` and returns the longest
    /// match, breaking length ties in favor of the lowest token id.
    ///
    /// Progress into a branch that later dead-ends never discards an
    /// earlier recorded accept; `None` means no rule matched at all (a
    /// zero-length result).
    pub(crate) fn search(&self, text: &str, start: usize) -> Option<Match> {
        let mut closure = self.epsilon_closure(&[self.start()]);
        let mut best: Option<Match> = None;
        let mut offset = start;

        loop {
            let mut winner: Option<TokenId> = None;
            for &state in &closure {
                for &id in &self.state(state).accepts {
                    if winner.map_or(true, |current| id < current) {
                        winner = Some(id);
                    }
                }
            }
            if let Some(token) = winner {
                best = Some(Match { token, end: offset });
            }

            if closure.is_empty() || offset >= text.len() {
                break;
            }
            let Some(c) = text[offset..].chars().next() else {
                break;
            };

            let mut frontier: SmallVec<[StateId; 8]> = SmallVec::new();
            for &state in &closure {
                if let Some(&target) = self.state(state).next.get(&c) {
                    if !frontier.contains(&target) {
                        frontier.push(target);
                    }
                }
            }
            closure = self.epsilon_closure(&frontier);
            offset += c.len_utf8();
        }
        best
    }
}
