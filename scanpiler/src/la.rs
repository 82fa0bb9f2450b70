//! Assembles the DFAs a scanner for a [`Definition`] runs on.
//!
//! The top-level DFA recognises every token, the end of the input, and the
//! opening of every comment. Block comment bodies are scanned with a DFA of
//! their own.

use crate::definition::{Comment, Definition};
use scanpiler_automata::{dfa, nfa, CharSet, Dfa, RegEx, END_OF_STREAM};

/// What a top-level DFA item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelItem {
    /// The token at this index of [`Definition::tokens`].
    Token(usize),
    EndOfStream,
    /// The comment at this index of [`Definition::comments`].
    Comment(usize),
}

impl TopLevelItem {
    /// Decodes an item accepted by [`dfa_for_top_level`].
    pub fn from_item(definition: &Definition, item: usize) -> Option<Self> {
        let tokens = definition.tokens.len();
        match item {
            i if i < tokens => Some(TopLevelItem::Token(i)),
            i if i == tokens => Some(TopLevelItem::EndOfStream),
            // tokens + 1 is never assigned
            i if i >= tokens + 2 && i - tokens - 2 < definition.comments.len() => {
                Some(TopLevelItem::Comment(i - tokens - 2))
            }
            _ => None,
        }
    }

    /// The item id this stands for in the top-level DFA of `definition`.
    pub fn item(&self, definition: &Definition) -> usize {
        let tokens = definition.tokens.len();
        match self {
            TopLevelItem::Token(i) => *i,
            TopLevelItem::EndOfStream => tokens,
            TopLevelItem::Comment(i) => tokens + 2 + i,
        }
    }
}

/// Builds the DFA that recognises, in priority order, every token of `definition`,
/// then the end of the input, then every comment opener.
pub fn dfa_for_top_level(definition: &Definition) -> Dfa<usize> {
    let mut builder = nfa::Builder::new();

    for (i, (_, pattern)) in definition.tokens.iter().enumerate() {
        builder.add_item(TopLevelItem::Token(i).item(definition), pattern);
    }
    builder.add_item(
        TopLevelItem::EndOfStream.item(definition),
        &RegEx::class(CharSet::singleton(END_OF_STREAM)),
    );
    for (i, comment) in definition.comments.iter().enumerate() {
        let opener = match comment {
            Comment::Block { open, .. } => open,
            Comment::Line { pattern } => pattern,
        };
        builder.add_item(TopLevelItem::Comment(i).item(definition), opener);
    }

    log::debug!(
        "building top-level DFA for {} tokens and {} comments",
        definition.tokens.len(),
        definition.comments.len()
    );
    dfa::from_nfa(&builder.build())
}

/// Builds the DFA for the body of a non-nested block comment:
/// item 0 is any single character, item 1 is `close`.
pub fn dfa_for_non_nested_block_comment(close: &RegEx) -> Dfa<usize> {
    log::debug!("building comment DFA closing on {close}");
    let mut builder = nfa::Builder::new();

    builder
        .add_item(0, &RegEx::class(CharSet::all()))
        .add_item(1, close);

    dfa::from_nfa(&builder.build())
}

/// Builds the DFA for the body of a nested block comment:
/// item 0 is any single character, item 1 is `open` and item 2 is `close`.
pub fn dfa_for_nested_block_comment(open: &RegEx, close: &RegEx) -> Dfa<usize> {
    log::debug!("building nested comment DFA for {open} ... {close}");
    let mut builder = nfa::Builder::new();

    builder
        .add_item(0, &RegEx::class(CharSet::all()))
        .add_item(1, open)
        .add_item(2, close);

    dfa::from_nfa(&builder.build())
}

/// The body DFA for `comment`, or `None` for a line comment.
pub fn dfa_for_comment(comment: &Comment) -> Option<Dfa<usize>> {
    match comment {
        Comment::Line { .. } => None,
        Comment::Block {
            open,
            close,
            nested: true,
        } => Some(dfa_for_nested_block_comment(open, close)),
        Comment::Block {
            close,
            nested: false,
            ..
        } => Some(dfa_for_non_nested_block_comment(close)),
    }
}
