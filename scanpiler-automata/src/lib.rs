//! The automaton pipeline of a scanner generator: character sets, regular
//! expressions, Thompson construction of an NFA, and subset construction of a DFA.
//!
//! ```rust
//! use scanpiler_automata::*;
//!
//! let identifier = RegEx::sequence([
//!     CharSet::range(97, 122).into(),
//!     RegEx::many(CharSet::range(97, 122).into()),
//! ]);
//!
//! let mut builder = nfa::Builder::new();
//! builder
//!     .add_item(0, &RegEx::literal("if"))
//!     .add_item(1, &identifier);
//! let dfa = dfa::from_nfa(&builder.build());
//!
//! assert_eq!(dfa.matcher().accepts(codes("if")), Some(&0));
//! assert_eq!(dfa.matcher().accepts(codes("iffy")), Some(&1));
//! ```

mod charset;
mod fa;
mod matcher;
mod regex;

pub mod dfa;
pub mod nfa;

#[cfg(feature = "dot")]
mod dot;

pub use charset::{codes, CharCode, CharSet, END_OF_STREAM, MAX_CHAR};
pub use fa::{Automaton, Dfa, Nfa, Node, NodeRef, NodeSet};
pub use matcher::DfaMatcher;
pub use regex::RegEx;

/// Walks an automaton one symbol at a time.
pub trait Matcher {
    type Alphabet;
    type Item;

    /// accepts the specified symbol.
    ///
    /// If no transition accepts it, the matcher becomes stuck.
    fn accept(&mut self, inp: Self::Alphabet);
    fn accept_many(&mut self, inp: impl IntoIterator<Item = Self::Alphabet>) {
        for i in inp {
            self.accept(i);
        }
    }

    /// Returns the item accepted after consuming the whole input iterator, if any
    fn accepts(&mut self, iter: impl IntoIterator<Item = Self::Alphabet>) -> Option<Self::Item> {
        for i in iter {
            self.accept(i);
            if self.is_stuck() {
                return None;
            }
        }

        self.accepting()
    }

    fn accepting(&self) -> Option<Self::Item>;
    fn is_stuck(&self) -> bool;
}

#[cfg(test)]
#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
