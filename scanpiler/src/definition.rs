use scanpiler_automata::{CharSet, RegEx};
use std::collections::BTreeMap;
use thiserror::Error;

/// A comment the scanner skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    /// Runs from `pattern` to wherever `pattern` stops matching.
    Line { pattern: RegEx },
    /// Runs from `open` to the matching `close`. Nested block comments track
    /// inner `open`s and need as many `close`s.
    Block {
        open: RegEx,
        close: RegEx,
        nested: bool,
    },
}

/// A named, reusable piece of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    RegEx(RegEx),
    CharSet(CharSet),
}

impl Fragment {
    /// A character set used where an expression is needed matches one of its characters.
    pub fn into_regex(self) -> RegEx {
        match self {
            Fragment::RegEx(regex) => regex,
            Fragment::CharSet(cc) => RegEx::CharacterClass(cc),
        }
    }
}

impl From<RegEx> for Fragment {
    fn from(value: RegEx) -> Self {
        Fragment::RegEx(value)
    }
}

impl From<CharSet> for Fragment {
    fn from(value: CharSet) -> Self {
        Fragment::CharSet(value)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("token {0} is already defined")]
    DuplicateToken(String),
    #[error("fragment {0} is already defined")]
    DuplicateFragment(String),
}

/// A lexical definition: the tokens to recognise, the comments and whitespace to skip,
/// and the fragments the other declarations were written in terms of.
///
/// Token order is priority order. When two tokens match the same input the
/// one declared first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub tokens: Vec<(String, RegEx)>,
    pub comments: Vec<Comment>,
    pub whitespace: CharSet,
    fragments: BTreeMap<String, Fragment>,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            comments: Vec::new(),
            whitespace: CharSet::range(0, 32),
            fragments: BTreeMap::new(),
        }
    }
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a token. Without a `position`, or with one past the last token,
    /// the token is appended and so has the lowest priority so far.
    pub fn add_token(
        &mut self,
        name: impl Into<String>,
        pattern: RegEx,
        position: Option<usize>,
    ) -> Result<&mut Self, DefinitionError> {
        let name = name.into();
        if self.has_token(&name) {
            return Err(DefinitionError::DuplicateToken(name));
        }

        match position {
            Some(position) if position < self.tokens.len() => {
                self.tokens.insert(position, (name, pattern))
            }
            _ => self.tokens.push((name, pattern)),
        }

        Ok(self)
    }

    pub fn token(&self, name: &str) -> Option<&RegEx> {
        self.tokens
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, pattern)| pattern)
    }

    pub fn has_token(&self, name: &str) -> bool {
        self.token(name).is_some()
    }

    pub fn add_comment(&mut self, comment: Comment) -> &mut Self {
        self.comments.push(comment);
        self
    }

    pub fn set_whitespace(&mut self, whitespace: CharSet) -> &mut Self {
        self.whitespace = whitespace;
        self
    }

    pub fn add_fragment(
        &mut self,
        name: impl Into<String>,
        fragment: impl Into<Fragment>,
    ) -> Result<&mut Self, DefinitionError> {
        let name = name.into();
        if self.has_fragment(&name) {
            return Err(DefinitionError::DuplicateFragment(name));
        }

        self.fragments.insert(name, fragment.into());
        Ok(self)
    }

    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    pub fn has_fragment(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// The highest priority token whose pattern literally spells out all of `text`.
    pub fn literal_match(&self, text: &str) -> Option<&(String, RegEx)> {
        let length = text.chars().count();
        self.tokens
            .iter()
            .find(|(_, pattern)| pattern.literal_match(text) == Some(length))
    }
}
