use crate::charset::{CharCode, CharSet};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// A regular expression over [`CharCode`]s.
///
/// The tree is finite and every node owns its children outright.
#[derive(Hash, Debug, Clone, PartialEq, Eq)]
pub enum RegEx {
    /// Exactly one character from the set.
    CharacterClass(CharSet),
    /// The exact sequence of characters; the empty string matches the empty input.
    LiteralString(String),
    /// Zero or more repetitions.
    Many(Box<RegEx>),
    /// Zero or one occurrence.
    Optional(Box<RegEx>),
    Sequence(Vec<RegEx>),
    Alternative(Vec<RegEx>),
}

impl RegEx {
    pub fn class(cc: CharSet) -> Self {
        RegEx::CharacterClass(cc)
    }

    pub fn literal(text: impl Into<String>) -> Self {
        RegEx::LiteralString(text.into())
    }

    pub fn many(inner: RegEx) -> Self {
        RegEx::Many(Box::new(inner))
    }

    pub fn optional(inner: RegEx) -> Self {
        RegEx::Optional(Box::new(inner))
    }

    pub fn sequence(items: impl IntoIterator<Item = RegEx>) -> Self {
        RegEx::Sequence(items.into_iter().collect())
    }

    pub fn alternative(items: impl IntoIterator<Item = RegEx>) -> Self {
        RegEx::Alternative(items.into_iter().collect())
    }

    /// Returns how many leading characters of `text` this expression consumes,
    /// provided the expression is purely literal and matches.
    ///
    /// Repetitions, options and alternatives never match literally.
    pub fn literal_match(&self, text: &str) -> Option<usize> {
        let text: Vec<CharCode> = crate::charset::codes(text).collect();
        self.literal_match_codes(&text)
    }

    fn literal_match_codes(&self, text: &[CharCode]) -> Option<usize> {
        match self {
            RegEx::CharacterClass(cc) => match text.first() {
                Some(&code) if cc.is_singleton() && cc.contains(code) => Some(1),
                _ => None,
            },
            RegEx::LiteralString(value) => {
                let value: Vec<CharCode> = crate::charset::codes(value).collect();
                text.starts_with(&value).then_some(value.len())
            }
            RegEx::Sequence(items) => {
                let mut matched = 0;
                for item in items {
                    matched += item.literal_match_codes(&text[matched..])?;
                }
                Some(matched)
            }
            RegEx::Many(_) | RegEx::Optional(_) | RegEx::Alternative(_) => None,
        }
    }
}

impl From<CharSet> for RegEx {
    fn from(value: CharSet) -> Self {
        RegEx::CharacterClass(value)
    }
}

impl Display for RegEx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegEx::CharacterClass(cc) => write!(f, "{cc}"),
            RegEx::LiteralString(s) => write!(f, "{s:?}"),
            RegEx::Many(r) => write!(f, "{{{r}}}"),
            RegEx::Optional(r) => write!(f, "[{r}]"),
            RegEx::Sequence(items) => write!(f, "({})", items.iter().join(" ")),
            RegEx::Alternative(items) => write!(f, "({})", items.iter().join(" | ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CharSet, RegEx};

    fn chr(c: char) -> RegEx {
        RegEx::class(CharSet::singleton(c as i32))
    }

    #[test]
    fn literal_match() {
        assert_eq!(RegEx::literal("hello").literal_match("hello"), Some(5));
        assert_eq!(RegEx::literal("hello").literal_match("helloworld"), Some(5));
        assert_eq!(RegEx::literal("hello").literal_match("help"), None);
        assert_eq!(RegEx::literal("").literal_match("abc"), Some(0));

        assert_eq!(
            RegEx::sequence([RegEx::literal("hel"), RegEx::literal("lo")])
                .literal_match("helloworld"),
            Some(5)
        );
        assert_eq!(
            RegEx::sequence([RegEx::literal("hel"), RegEx::literal("Lo")])
                .literal_match("helloworld"),
            None
        );
        assert_eq!(
            RegEx::sequence([chr('h'), RegEx::literal("el"), chr('l'), RegEx::literal("o")])
                .literal_match("helloworld"),
            Some(5)
        );
    }

    #[test]
    fn literal_match_rejects_non_literal_forms() {
        assert_eq!(RegEx::class(CharSet::range(97, 98)).literal_match("a"), None);
        assert_eq!(chr('a').literal_match(""), None);
        assert_eq!(RegEx::many(chr('a')).literal_match("a"), None);
        assert_eq!(RegEx::optional(chr('a')).literal_match("a"), None);
        assert_eq!(RegEx::alternative([chr('a')]).literal_match("a"), None);
    }

    #[test]
    fn display() {
        let re = RegEx::sequence([
            chr('a'),
            RegEx::many(RegEx::alternative([chr('b'), RegEx::literal("cd")])),
            RegEx::optional(chr('e')),
        ]);

        assert_eq!(re.to_string(), "({'a'} {({'b'} | \"cd\")} [{'e'}])");
    }
}
