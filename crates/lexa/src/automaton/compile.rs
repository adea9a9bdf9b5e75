//! Pattern compilation: folds one regular-expression-like pattern at a
//! time into a shared automaton by extending a frontier of active states.
//!
//! Supported operators: `|` alternation (the branch owns the rest of its
//! scope), `(...)` grouping, `+` one-or-more, and `\` escaping the next
//! character. Everything else is a literal.
//!
//! Every literal step allocates a fresh state so that patterns merged into
//! the same start state cannot form accidental cycles. When a frontier
//! state already has an edge for the character, the new path is attached
//! as an epsilon edge to an intermediate state instead of overwriting —
//! this is where nondeterminism between prefix-sharing patterns enters.

use super::{Automaton, StateId, TokenId};
use crate::error::{PatternError, PatternErrorKind};
use smallvec::{smallvec, SmallVec};

/// States reachable by the portion of the pattern consumed so far.
pub(crate) type Frontier = SmallVec<[StateId; 4]>;

/// Compiles `pattern` into `automaton` starting at `origin`, marking the
/// final frontier as accepting `accept`. The observer is invoked with the
/// character position in the pattern after each consumed character.
pub(crate) fn compile(
    automaton: &mut Automaton,
    origin: StateId,
    pattern: &str,
    accept: TokenId,
    observer: &mut dyn FnMut(usize),
) -> Result<Frontier, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    compile_scope(automaton, origin, &chars, 0, Some(accept), false, observer)
}

fn compile_scope(
    automaton: &mut Automaton,
    origin: StateId,
    chars: &[char],
    base: usize,
    accept: Option<TokenId>,
    in_group: bool,
    observer: &mut dyn FnMut(usize),
) -> Result<Frontier, PatternError> {
    let mut frontier: Frontier = smallvec![origin];
    // State the `+` operator loops back to: the last completed literal or
    // group entry.
    let mut restore_to = origin;
    let mut escaped = false;
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];
        if !escaped {
            match c {
                '\\' => {
                    if index + 1 == chars.len() {
                        return Err(PatternError::new(
                            base + index,
                            PatternErrorKind::TrailingEscape,
                        ));
                    }
                    escaped = true;
                    observer(base + index);
                    index += 1;
                    continue;
                }
                '|' => {
                    // The branch owns the rest of this scope; its frontier
                    // merges into ours. Reached via epsilon from the scope
                    // origin, not from the frontier.
                    let branch = automaton.add_state(None);
                    automaton.add_epsilon(origin, branch);
                    let merged = compile_scope(
                        automaton,
                        branch,
                        &chars[index + 1..],
                        base + index + 1,
                        None,
                        in_group,
                        observer,
                    )?;
                    frontier.extend(merged);
                    break;
                }
                '(' => {
                    let body = group_body(&chars[index + 1..]);
                    let sub_expr = automaton.add_state(None);
                    for &state in &frontier {
                        automaton.add_epsilon(state, sub_expr);
                    }
                    restore_to = sub_expr;
                    frontier = compile_scope(
                        automaton,
                        sub_expr,
                        body,
                        base + index + 1,
                        None,
                        true,
                        observer,
                    )?;
                    // Skip the body and its closing paren, if present.
                    index += body.len() + 1;
                    if index < chars.len() {
                        index += 1;
                    }
                    continue;
                }
                '+' => {
                    for i in 0..frontier.len() {
                        automaton.add_epsilon(frontier[i], restore_to);
                    }
                    observer(base + index);
                    index += 1;
                    continue;
                }
                ')' => {
                    if in_group {
                        // Balanced closers are stripped by slicing; an
                        // unmatched one ends the scope here.
                        break;
                    }
                    return Err(PatternError::new(
                        base + index,
                        PatternErrorKind::UnbalancedParen,
                    ));
                }
                _ => {}
            }
        }
        escaped = false;

        // Literal character: a fresh state plus an intermediate state
        // carrying the same transition, used both as the `+` restore point
        // and as the epsilon target for frontier states whose edge on this
        // character is already taken.
        let use_state = automaton.add_state(Some(c));
        restore_to = automaton.add_state(None);
        automaton.add_edge(restore_to, c, use_state);
        for i in 0..frontier.len() {
            let state = frontier[i];
            if automaton.state(state).next.contains_key(&c) {
                automaton.add_epsilon(state, restore_to);
            } else {
                automaton.add_edge(state, c, use_state);
            }
        }
        frontier.clear();
        frontier.push(use_state);
        observer(base + index);
        index += 1;
    }

    if let Some(id) = accept {
        for &state in &frontier {
            let accepts = &mut automaton.state_mut(state).accepts;
            if !accepts.contains(&id) {
                accepts.push(id);
            }
        }
    }
    Ok(frontier)
}

/// The body of a group whose opening paren was just consumed: everything
/// up to its unescaped balanced closer, or the whole rest of the pattern
/// when the group is never closed.
fn group_body(chars: &[char]) -> &[char] {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth == 0 => return &chars[..i],
            ')' => depth -= 1,
            _ => {}
        }
    }
    chars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_one(automaton: &mut Automaton, pattern: &str, id: u32) -> Frontier {
        let start = automaton.start();
        compile(automaton, start, pattern, TokenId(id), &mut |_| {}).unwrap()
    }

    #[test]
    fn test_literal_chain() {
        let mut automaton = Automaton::new();
        let frontier = compile_one(&mut automaton, "ab", 0);
        assert_eq!(frontier.len(), 1);
        assert_eq!(automaton.state(frontier[0]).accepts.as_slice(), &[TokenId(0)]);
        assert_eq!(automaton.state(frontier[0]).label, Some('b'));
    }

    #[test]
    fn test_shared_prefix_becomes_epsilon() {
        let mut automaton = Automaton::new();
        compile_one(&mut automaton, "ab", 0);
        compile_one(&mut automaton, "ac", 1);
        // The second pattern may not overwrite the start state's 'a' edge;
        // the conflict must surface as an epsilon edge instead.
        let start = automaton.state(automaton.start());
        assert_eq!(start.next.len(), 1);
        assert!(!start.epsilon.is_empty());
    }

    #[test]
    fn test_alternation_branches_from_origin() {
        let mut automaton = Automaton::new();
        let frontier = compile_one(&mut automaton, "cat|car", 0);
        // Both branch ends accept.
        assert_eq!(frontier.len(), 2);
        for state in frontier {
            assert_eq!(automaton.state(state).accepts.as_slice(), &[TokenId(0)]);
        }
    }

    #[test]
    fn test_empty_alternation_branch_keeps_origin_in_frontier() {
        let mut automaton = Automaton::new();
        // `(|b)` means "nothing or b": the group entry itself stays on the
        // frontier and must end up accepting.
        let frontier = compile_one(&mut automaton, "a(|b)", 0);
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_repetition_loops_to_restore_state() {
        let mut automaton = Automaton::new();
        let frontier = compile_one(&mut automaton, "a+", 0);
        assert_eq!(frontier.len(), 1);
        // The accepting state loops back via epsilon; its target carries
        // the same 'a' transition.
        let epsilon = &automaton.state(frontier[0]).epsilon;
        assert_eq!(epsilon.len(), 1);
        assert!(automaton.state(epsilon[0]).next.contains_key(&'a'));
    }

    #[test]
    fn test_group_body_extraction() {
        let chars: Vec<char> = "ab)cd".chars().collect();
        assert_eq!(group_body(&chars), &chars[..2]);

        let nested: Vec<char> = "a(b)c)d".chars().collect();
        assert_eq!(group_body(&nested), &nested[..5]);

        let escaped: Vec<char> = "a\\)b)c".chars().collect();
        assert_eq!(group_body(&escaped), &escaped[..4]);

        let unclosed: Vec<char> = "abc".chars().collect();
        assert_eq!(group_body(&unclosed), &unclosed[..]);
    }

    #[test]
    fn test_unbalanced_close_is_an_error() {
        let mut automaton = Automaton::new();
        let start = automaton.start();
        let error = compile(&mut automaton, start, "a)b", TokenId(0), &mut |_| {}).unwrap_err();
        assert_eq!(error.kind, PatternErrorKind::UnbalancedParen);
        assert_eq!(error.position, 1);
    }

    #[test]
    fn test_trailing_escape_is_an_error() {
        let mut automaton = Automaton::new();
        let start = automaton.start();
        let error = compile(&mut automaton, start, "ab\\", TokenId(0), &mut |_| {}).unwrap_err();
        assert_eq!(error.kind, PatternErrorKind::TrailingEscape);
        assert_eq!(error.position, 2);
    }

    #[test]
    fn test_escaped_operators_are_literals() {
        let mut automaton = Automaton::new();
        let frontier = compile_one(&mut automaton, "\\(", 0);
        assert_eq!(automaton.state(frontier[0]).label, Some('('));
    }

    #[test]
    fn test_observer_reports_positions() {
        let mut automaton = Automaton::new();
        let start = automaton.start();
        let mut positions = Vec::new();
        compile(&mut automaton, start, "a(b|c)d", TokenId(0), &mut |p| {
            positions.push(p);
        })
        .unwrap();
        // Group content is reported at absolute positions by the
        // sub-compilation; the parens themselves are silent.
        assert!(positions.contains(&0));
        assert!(positions.contains(&2));
        assert!(positions.contains(&4));
        assert!(positions.contains(&6));
        assert!(!positions.contains(&1));
        assert!(!positions.contains(&5));
    }
}
