//! Subset construction: collapses an epsilon-bearing nondeterministic
//! automaton into an equivalent deterministic one.
//!
//! Deterministic states are identified by the exact set of merged source
//! states, so a set already resolved is reused instead of duplicated —
//! this bounds the construction and keeps it finite on cyclic graphs.
//! Alphabet iteration is in sorted character order, which makes the state
//! numbering (and everything downstream of it) independent of map
//! iteration order.

use super::{Automaton, StateId, TokenId};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Memoized per-(state, character) reachability: the epsilon closure of
/// the state's successor on that character.
///
/// Owned by a single determinization pass. The automaton it was computed
/// over must not change while the cache is alive; scoping the cache to the
/// pass makes a stale reuse impossible to express.
#[derive(Default)]
struct ClosureCache {
    memo: HashMap<(StateId, char), Box<[StateId]>, ahash::RandomState>,
}

impl ClosureCache {
    fn extend_accessible(
        &mut self,
        automaton: &Automaton,
        state: StateId,
        c: char,
        out: &mut Vec<StateId>,
    ) {
        let closure = self.memo.entry((state, c)).or_insert_with(|| {
            automaton.state(state).next.get(&c).map_or_else(Box::default, |&target| {
                automaton.epsilon_closure(&[target]).into_boxed_slice()
            })
        });
        out.extend_from_slice(closure);
    }
}

/// Builds a deterministic automaton equivalent to `nfa`. The observer is
/// invoked with the number of deterministic states built so far, once per
/// state taken off the work queue.
pub(crate) fn determinize(nfa: &Automaton, observer: &mut dyn FnMut(usize)) -> Automaton {
    let mut dfa = Automaton::new();
    let mut cache = ClosureCache::default();
    // Already-resolved state sets; keyed by the exact sorted set so two
    // identical closures always map to the same deterministic state.
    let mut resolved: HashMap<Vec<StateId>, StateId, ahash::RandomState> = HashMap::default();
    let mut queue: VecDeque<(StateId, Vec<StateId>)> = VecDeque::new();

    let start_closure = nfa.epsilon_closure(&[nfa.start()]);
    dfa.state_mut(dfa.start()).accepts = union_accepts(nfa, &start_closure);
    resolved.insert(start_closure.clone(), dfa.start());
    queue.push_back((dfa.start(), start_closure));

    while let Some((dfa_id, closure)) = queue.pop_front() {
        observer(dfa.len());

        let mut alphabet: Vec<char> = closure
            .iter()
            .flat_map(|&state| nfa.state(state).next.keys().copied())
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        for c in alphabet {
            let mut target: Vec<StateId> = Vec::new();
            for &state in &closure {
                cache.extend_accessible(nfa, state, c, &mut target);
            }
            target.sort_unstable();
            target.dedup();

            let next_id = if let Some(&existing) = resolved.get(&target) {
                existing
            } else {
                let created = dfa.add_state(Some(c));
                dfa.state_mut(created).accepts = union_accepts(nfa, &target);
                resolved.insert(target.clone(), created);
                queue.push_back((created, target));
                created
            };
            dfa.add_edge(dfa_id, c, next_id);
        }
    }
    dfa
}

/// Distinct accept ids over a closure set, in ascending id order.
fn union_accepts(nfa: &Automaton, closure: &[StateId]) -> SmallVec<[TokenId; 1]> {
    let mut accepts: SmallVec<[TokenId; 1]> = SmallVec::new();
    for &state in closure {
        for &id in &nfa.state(state).accepts {
            if !accepts.contains(&id) {
                accepts.push(id);
            }
        }
    }
    accepts.sort_unstable();
    accepts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::compile::compile;

    fn nfa_for(patterns: &[&str]) -> Automaton {
        let mut nfa = Automaton::new();
        let start = nfa.start();
        for (index, pattern) in patterns.iter().enumerate() {
            compile(&mut nfa, start, pattern, TokenId(index as u32), &mut |_| {}).unwrap();
        }
        nfa
    }

    fn assert_deterministic(dfa: &Automaton) {
        for id in dfa.state_ids() {
            assert!(
                dfa.state(id).epsilon.is_empty(),
                "state {id:?} still has epsilon edges"
            );
        }
    }

    #[test]
    fn test_output_has_no_epsilon_edges() {
        let nfa = nfa_for(&["ab", "ac", "a+"]);
        let dfa = determinize(&nfa, &mut |_| {});
        assert_deterministic(&dfa);
    }

    #[test]
    fn test_terminates_on_cyclic_nfa() {
        let nfa = nfa_for(&["(a|b)+"]);
        let dfa = determinize(&nfa, &mut |_| {});
        assert_deterministic(&dfa);
        // Cycle collapses onto a bounded number of subset states.
        assert!(dfa.len() <= nfa.len());
    }

    #[test]
    fn test_ambiguous_accepts_are_unioned() {
        // Both rules accept the exact same lexeme; the merged accepting
        // state must report both ids, in ascending order.
        let nfa = nfa_for(&["ab", "ab"]);
        let dfa = determinize(&nfa, &mut |_| {});
        let accepting: Vec<_> = dfa
            .state_ids()
            .filter(|&id| !dfa.state(id).accepts.is_empty())
            .collect();
        assert_eq!(accepting.len(), 1);
        assert_eq!(
            dfa.state(accepting[0]).accepts.as_slice(),
            &[TokenId(0), TokenId(1)]
        );
    }

    #[test]
    fn test_search_agrees_with_nfa() {
        let nfa = nfa_for(&["cat|car", "ca", "c+"]);
        let dfa = determinize(&nfa, &mut |_| {});
        for input in ["cat", "car", "ca", "c", "cc", "cab", "x", ""] {
            assert_eq!(
                nfa.search(input, 0),
                dfa.search(input, 0),
                "divergence on {input:?}"
            );
        }
    }

    #[test]
    fn test_construction_is_reproducible() {
        let first = determinize(&nfa_for(&["ab", "a+", "(x|y)+z"]), &mut |_| {});
        let second = determinize(&nfa_for(&["ab", "a+", "(x|y)+z"]), &mut |_| {});
        assert_eq!(first.len(), second.len());
        for (a, b) in first.state_ids().zip(second.state_ids()) {
            assert_eq!(first.state(a).accepts, second.state(b).accepts);
            assert_eq!(first.state(a).next.len(), second.state(b).next.len());
        }
    }

    #[test]
    fn test_observer_counts_states() {
        let nfa = nfa_for(&["ab"]);
        let mut calls = 0;
        let dfa = determinize(&nfa, &mut |states| {
            calls += 1;
            assert!(states <= 3);
        });
        // One call per dequeued state.
        assert_eq!(calls, dfa.len());
    }
}
