//! Arena-backed finite automaton shared by every stage of the build
//! pipeline.
//!
//! States live in a single vector and every edge is a [`StateId`] index
//! into that vector, so the graph may freely contain cycles (the `+`
//! operator creates them) while the whole automaton stays one droppable
//! unit. A state has at most one `next` successor per character; all
//! nondeterminism is expressed structurally through epsilon edges, never
//! through multi-valued transition entries.

pub(crate) mod compile;
pub(crate) mod determinize;
pub(crate) mod minimize;
pub(crate) mod search;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Index of a state in the automaton arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct StateId(pub(crate) u32);

impl StateId {
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a token rule.
///
/// Ids are assigned in registration order; when two rules accept the same
/// longest lexeme, the lower id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TokenId(pub(crate) u32);

impl TokenId {
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single automaton state.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    /// The character consumed to arrive in this state. Debug value only.
    pub(crate) label: Option<char>,
    /// Deterministic transitions, at most one successor per character.
    pub(crate) next: HashMap<char, StateId>,
    /// States reached without consuming a character.
    pub(crate) epsilon: SmallVec<[StateId; 2]>,
    /// Token ids accepted when a match ends in this state.
    pub(crate) accepts: SmallVec<[TokenId; 1]>,
}

/// The automaton graph. Mutated only during construction; scanned
/// read-only afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Automaton {
    states: Vec<State>,
}

impl Automaton {
    /// A fresh automaton holding only its start state.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            states: vec![State::default()],
        }
    }

    #[must_use]
    pub(crate) const fn start(&self) -> StateId {
        StateId(0)
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..u32::try_from(self.states.len()).unwrap_or(0)).map(StateId)
    }

    pub(crate) fn add_state(&mut self, label: Option<char>) -> StateId {
        let id = StateId(u32::try_from(self.states.len()).unwrap_or(0));
        self.states.push(State {
            label,
            ..State::default()
        });
        id
    }

    #[must_use]
    pub(crate) fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }

    pub(crate) fn add_edge(&mut self, from: StateId, c: char, to: StateId) {
        self.state_mut(from).next.insert(c, to);
    }

    pub(crate) fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.state_mut(from).epsilon.push(to);
    }

    /// All states reachable from `seeds` over epsilon edges alone,
    /// including the seeds themselves. Sorted by id, each state once, and
    /// safe on cyclic graphs.
    #[must_use]
    pub(crate) fn epsilon_closure(&self, seeds: &[StateId]) -> Vec<StateId> {
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<StateId> = Vec::with_capacity(seeds.len());
        let mut closure: Vec<StateId> = Vec::with_capacity(seeds.len());

        for &seed in seeds {
            if !visited[seed.index()] {
                visited[seed.index()] = true;
                stack.push(seed);
                closure.push(seed);
            }
        }
        while let Some(state) = stack.pop() {
            for &next in &self.states[state.index()].epsilon {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push(next);
                    closure.push(next);
                }
            }
        }
        closure.sort_unstable();
        closure
    }
}
