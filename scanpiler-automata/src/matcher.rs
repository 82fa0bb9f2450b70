//! Contains the [`DfaMatcher`], which walks a [`Dfa`] one character code at a time.
//! It interprets the automaton directly; generating a scanner from it is left to callers.

use crate::charset::CharCode;
use crate::fa::{Dfa, NodeRef};
use crate::Matcher;

pub struct DfaMatcher<'a, T> {
    automaton: &'a Dfa<T>,
    // `None` once no transition accepted the last input
    current_state: Option<NodeRef>,
}

impl<T> Dfa<T> {
    pub fn matcher(&self) -> DfaMatcher<'_, T> {
        DfaMatcher {
            automaton: self,
            current_state: Some(self.start_node),
        }
    }

    /// Scans `input` with maximal munch, returning the length of the longest
    /// accepted prefix together with the item it is accepted as.
    pub fn longest_match(&self, input: impl IntoIterator<Item = CharCode>) -> Option<(usize, &T)> {
        let mut matcher = self.matcher();
        let mut longest = matcher.accepting().map(|item| (0, item));

        for (consumed, code) in input.into_iter().enumerate() {
            matcher.accept(code);
            if matcher.is_stuck() {
                break;
            }
            if let Some(item) = matcher.accepting() {
                longest = Some((consumed + 1, item));
            }
        }

        longest
    }
}

impl<T> DfaMatcher<'_, T> {
    pub fn state(&self) -> Option<NodeRef> {
        self.current_state
    }
}

impl<'a, T> Matcher for DfaMatcher<'a, T> {
    type Alphabet = CharCode;
    type Item = &'a T;

    fn accept(&mut self, inp: CharCode) {
        self.current_state = self
            .current_state
            .and_then(|state| self.automaton.step(state, inp));
    }

    fn accepting(&self) -> Option<&'a T> {
        self.current_state
            .and_then(|state| self.automaton.item(state))
    }

    fn is_stuck(&self) -> bool {
        self.current_state.is_none()
    }
}
