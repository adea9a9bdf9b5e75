//! Partition-refinement minimization of a deterministic automaton.
//!
//! Two states merge only when they carry the exact same accept set and,
//! for every character, transition into the same equivalence class. The
//! accept-set seeding is what preserves the precedence tie-break: states
//! accepting different token sets stay distinguishable even when all their
//! futures are identical, because a scan stopping on them reports a
//! different winner.

use super::{Automaton, StateId, TokenId};
use crate::error::BuildError;
use hashbrown::HashMap;

/// Collapses `dfa` into the smallest automaton with identical matching
/// behavior. Expects deterministic input; an inconsistent partition is a
/// defect in this crate and surfaces as [`BuildError::Internal`].
pub(crate) fn minimize(dfa: &Automaton) -> Result<Automaton, BuildError> {
    let state_count = dfa.len();
    let mut group: Vec<u32> = vec![0; state_count];

    // Initial partition: the exact accept set, not just emptiness.
    let mut group_count = {
        let mut buckets: HashMap<Vec<TokenId>, u32, ahash::RandomState> = HashMap::default();
        let mut count = 0u32;
        for (index, id) in dfa.state_ids().enumerate() {
            let key: Vec<TokenId> = dfa.state(id).accepts.to_vec();
            let assigned = *buckets.entry(key).or_insert_with(|| {
                let fresh = count;
                count += 1;
                fresh
            });
            group[index] = assigned;
        }
        count
    };

    // Refine: split any group whose members disagree, on some character,
    // about the group of the target state. Refinement only ever splits, so
    // the group count grows monotonically and the loop terminates.
    loop {
        let mut buckets: HashMap<(u32, Vec<(char, u32)>), u32, ahash::RandomState> =
            HashMap::default();
        let mut next = vec![0u32; state_count];
        let mut count = 0u32;
        for (index, id) in dfa.state_ids().enumerate() {
            let mut signature: Vec<(char, u32)> = dfa
                .state(id)
                .next
                .iter()
                .map(|(&c, &target)| (c, group[target.index()]))
                .collect();
            signature.sort_unstable_by_key(|&(c, _)| c);
            let assigned = *buckets.entry((group[index], signature)).or_insert_with(|| {
                let fresh = count;
                count += 1;
                fresh
            });
            next[index] = assigned;
        }
        let stable = count == group_count;
        group = next;
        group_count = count;
        if stable {
            break;
        }
    }

    // One representative per class: the lowest member id. Classes are
    // numbered by first occurrence in id order, so the start state's class
    // is 0 and becomes the new start.
    let mut representative: Vec<Option<StateId>> = vec![None; group_count as usize];
    for (index, id) in dfa.state_ids().enumerate() {
        let slot = &mut representative[group[index] as usize];
        match *slot {
            None => *slot = Some(id),
            Some(rep) => {
                if dfa.state(rep).accepts != dfa.state(id).accepts {
                    return Err(BuildError::Internal {
                        reason: "minimization merged states with different accept sets",
                    });
                }
            }
        }
    }

    let mut minimized = Automaton::new();
    for class in 1..representative.len() {
        let Some(rep) = representative[class] else {
            return Err(BuildError::Internal {
                reason: "equivalence class without members",
            });
        };
        minimized.add_state(dfa.state(rep).label);
    }
    for (class, slot) in representative.iter().enumerate() {
        let Some(rep) = *slot else {
            return Err(BuildError::Internal {
                reason: "equivalence class without members",
            });
        };
        let target = StateId(u32::try_from(class).unwrap_or(0));
        minimized.state_mut(target).accepts = dfa.state(rep).accepts.clone();
        let mut transitions: Vec<(char, StateId)> = dfa
            .state(rep)
            .next
            .iter()
            .map(|(&c, &to)| (c, StateId(group[to.index()])))
            .collect();
        transitions.sort_unstable_by_key(|&(c, _)| c);
        for (c, to) in transitions {
            minimized.add_edge(target, c, to);
        }
    }
    Ok(minimized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::compile::compile;
    use crate::automaton::determinize::determinize;

    fn pipeline(patterns: &[&str]) -> (Automaton, Automaton, Automaton) {
        let mut nfa = Automaton::new();
        let start = nfa.start();
        for (index, pattern) in patterns.iter().enumerate() {
            compile(&mut nfa, start, pattern, TokenId(index as u32), &mut |_| {}).unwrap();
        }
        let dfa = determinize(&nfa, &mut |_| {});
        let minimized = minimize(&dfa).unwrap();
        (nfa, dfa, minimized)
    }

    /// Every string over `alphabet` up to `max_len` characters.
    fn enumerate_inputs(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut inputs = vec![String::new()];
        let mut last = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for prefix in &last {
                for &c in alphabet {
                    let mut s = prefix.clone();
                    s.push(c);
                    next.push(s);
                }
            }
            inputs.extend(next.iter().cloned());
            last = next;
        }
        inputs
    }

    #[test]
    fn test_preserves_behavior_exhaustively() {
        let (nfa, dfa, minimized) = pipeline(&["ab", "a", "(a|b)+c", "b+"]);
        for input in enumerate_inputs(&['a', 'b', 'c'], 4) {
            let expected = dfa.search(&input, 0);
            assert_eq!(minimized.search(&input, 0), expected, "on {input:?}");
            assert_eq!(nfa.search(&input, 0), expected, "nfa on {input:?}");
        }
    }

    #[test]
    fn test_never_grows() {
        let (_, dfa, minimized) = pipeline(&["abc", "abd", "xbc", "xbd"]);
        assert!(minimized.len() <= dfa.len());
    }

    #[test]
    fn test_merges_equivalent_tails() {
        // `abc` and `xbc` share an identical two-character tail; after
        // minimization the tails collapse onto one path.
        let (_, dfa, minimized) = pipeline(&["abc|xbc"]);
        assert!(minimized.len() < dfa.len());
    }

    #[test]
    fn test_accept_sets_stay_distinct() {
        // Same shape, different token ids: the two accepting states must
        // not merge, or the precedence report would change.
        let (_, _, minimized) = pipeline(&["a", "b"]);
        let accepting: Vec<_> = minimized
            .state_ids()
            .filter(|&id| !minimized.state(id).accepts.is_empty())
            .collect();
        assert_eq!(accepting.len(), 2);
    }

    #[test]
    fn test_single_state_automaton() {
        let automaton = Automaton::new();
        let minimized = minimize(&automaton).unwrap();
        assert_eq!(minimized.len(), 1);
        assert!(minimized.state(minimized.start()).accepts.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let (_, _, minimized) = pipeline(&["ab|ac", "a+"]);
        let again = minimize(&minimized).unwrap();
        assert_eq!(again.len(), minimized.len());
    }
}
