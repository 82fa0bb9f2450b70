//! A scanner generator.
//!
//! A scanner is described by a [`Definition`]: prioritised tokens, comments and
//! whitespace, written in terms of named fragments. Definitions come either from
//! the [`ast`] of the definition language, through [`translate()`], or are put
//! together directly. The [`la`] module then assembles the DFAs that a generated
//! scanner runs on.
//!
//! ```rust
//! use scanpiler::*;
//!
//! let lower = CharSet::range(97, 122);
//! let mut definition = Definition::new();
//! definition
//!     .add_token("if", RegEx::literal("if"), None)
//!     .unwrap()
//!     .add_token("ident", RegEx::sequence([lower.into(), RegEx::many(lower.into())]), None)
//!     .unwrap();
//!
//! let dfa = la::dfa_for_top_level(&definition);
//! assert_eq!(dfa.longest_match(codes("if ")), Some((2, &0)));
//! assert_eq!(dfa.longest_match(codes("iffy")), Some((4, &1)));
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

pub mod ast;
pub mod la;

mod definition;
pub use definition::{Comment, Definition, DefinitionError, Fragment};

mod translate;
pub use translate::{translate, TranslateError};

pub use scanpiler_automata::*;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
