use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitAnd, BitOr, Sub};

/// A character code: a single byte `0..=255`, or [`END_OF_STREAM`].
pub type CharCode = i32;

/// The code a scanner feeds to an automaton once its input is exhausted.
pub const END_OF_STREAM: CharCode = -1;

/// The largest code a [`CharSet`] can hold.
pub const MAX_CHAR: CharCode = 255;

const WORDS: usize = 5;

/// A finite set of [`CharCode`]s in `-1..=255`.
///
/// Sets are compared, ordered and hashed by their elements, so two sets built
/// in different ways but holding the same codes are interchangeable as map keys.
/// Codes outside the representable domain are ignored on insertion; rejecting
/// them is up to whoever produces the codes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharSet {
    bits: [u64; WORDS],
}

fn slot(code: CharCode) -> Option<(usize, u64)> {
    if !(END_OF_STREAM..=MAX_CHAR).contains(&code) {
        return None;
    }

    let index = (code - END_OF_STREAM) as usize;
    Some((index / 64, 1 << (index % 64)))
}

impl CharSet {
    /// The empty set. As a transition label it denotes an epsilon transition.
    pub const fn empty() -> Self {
        Self { bits: [0; WORDS] }
    }

    pub fn singleton(code: CharCode) -> Self {
        Self::of([code])
    }

    /// Builds a set from explicit elements.
    pub fn of(codes: impl IntoIterator<Item = CharCode>) -> Self {
        codes.into_iter().collect()
    }

    /// The inclusive span `lo..=hi`. Empty when `lo > hi`.
    pub fn range(lo: CharCode, hi: CharCode) -> Self {
        (lo..=hi).collect()
    }

    /// Every byte, `0..=255`. Does not contain [`END_OF_STREAM`].
    pub fn all() -> Self {
        Self::range(0, MAX_CHAR)
    }

    /// Adds `code`, returning whether it was newly inserted.
    pub fn insert(&mut self, code: CharCode) -> bool {
        match slot(code) {
            Some((word, mask)) => {
                let fresh = self.bits[word] & mask == 0;
                self.bits[word] |= mask;
                fresh
            }
            None => false,
        }
    }

    pub fn contains(&self, code: CharCode) -> bool {
        slot(code).is_some_and(|(word, mask)| self.bits[word] & mask != 0)
    }

    pub fn union(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    /// The codes of `self` that are not in `other`.
    pub fn minus(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & !b)
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.intersection(other).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&word| word == 0)
    }

    pub fn is_singleton(&self) -> bool {
        self.len() == 1
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// The smallest element. Callers that need "the" element of a singleton use this.
    pub fn first(&self) -> Option<CharCode> {
        self.iter().next()
    }

    /// Iterates the elements in ascending order, [`END_OF_STREAM`] first.
    pub fn iter(&self) -> impl Iterator<Item = CharCode> + '_ {
        (END_OF_STREAM..=MAX_CHAR).filter(|&code| self.contains(code))
    }

    /// Groups the elements into maximal runs of consecutive codes.
    pub fn runs(&self) -> Vec<(CharCode, CharCode)> {
        let mut runs: Vec<(CharCode, CharCode)> = Vec::new();
        for code in self.iter() {
            match runs.last_mut() {
                Some((_, hi)) if *hi + 1 == code => *hi = code,
                _ => runs.push((code, code)),
            }
        }
        runs
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        let mut bits = [0; WORDS];
        for (i, word) in bits.iter_mut().enumerate() {
            *word = f(self.bits[i], other.bits[i]);
        }
        Self { bits }
    }
}

/// The codes of `text`, one per character.
pub fn codes(text: &str) -> impl Iterator<Item = CharCode> + '_ {
    text.chars().map(|c| u32::from(c) as CharCode)
}

impl FromIterator<CharCode> for CharSet {
    fn from_iter<I: IntoIterator<Item = CharCode>>(iter: I) -> Self {
        let mut set = CharSet::empty();
        set.extend(iter);
        set
    }
}

impl Extend<CharCode> for CharSet {
    fn extend<I: IntoIterator<Item = CharCode>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code);
        }
    }
}

impl BitOr for CharSet {
    type Output = CharSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

impl BitAnd for CharSet {
    type Output = CharSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl Sub for CharSet {
    type Output = CharSet;

    fn sub(self, rhs: Self) -> Self::Output {
        self.minus(&rhs)
    }
}

fn fmt_code(code: CharCode) -> String {
    match code {
        END_OF_STREAM => "eos".to_string(),
        // printable ascii, except the quote and backslash
        0x21..=0x7e if code != 0x27 && code != 0x5c => format!("'{}'", code as u8 as char),
        _ => code.to_string(),
    }
}

impl Display for CharSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let runs = self
            .runs()
            .into_iter()
            .map(|(lo, hi)| {
                if lo == hi {
                    fmt_code(lo)
                } else {
                    format!("{}-{}", fmt_code(lo), fmt_code(hi))
                }
            })
            .join(", ");
        write!(f, "{{{runs}}}")
    }
}

impl Debug for CharSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_equality() {
        assert_eq!(CharSet::of([3, 1, 2]), CharSet::range(1, 3));
        assert_eq!(
            CharSet::range(0, 10).minus(&CharSet::range(5, 10)),
            CharSet::range(0, 4)
        );
        assert_ne!(CharSet::singleton(1), CharSet::singleton(2));
    }

    #[test]
    fn algebra() {
        let a = CharSet::range(0, 100);
        let b = CharSet::range(50, 150);

        assert_eq!(a.union(&b), CharSet::range(0, 150));
        assert_eq!(a.intersection(&b), CharSet::range(50, 100));
        assert_eq!(a.minus(&b), CharSet::range(0, 49));
        assert_eq!(a | b, a.union(&b));
        assert_eq!(a & b, a.intersection(&b));
        assert_eq!(a - b, a.minus(&b));
        assert!(a.minus(&a).is_empty());
        assert!(CharSet::range(0, 9).is_disjoint(&CharSet::range(10, 20)));
    }

    #[test]
    fn end_of_stream_is_a_member() {
        let eos = CharSet::singleton(END_OF_STREAM);

        assert!(eos.contains(END_OF_STREAM));
        assert!(eos.is_singleton());
        assert_eq!(eos.first(), Some(END_OF_STREAM));
        assert!(!CharSet::all().contains(END_OF_STREAM));
        assert_eq!(CharSet::all().len(), 256);
    }

    #[test]
    fn out_of_domain_codes_are_ignored() {
        let mut set = CharSet::empty();

        assert!(!set.insert(256));
        assert!(!set.insert(-2));
        assert!(set.is_empty());
        assert!(!set.contains(1000));
    }

    #[test]
    fn singleton_and_first() {
        assert!(!CharSet::empty().is_singleton());
        assert_eq!(CharSet::empty().first(), None);
        assert!(CharSet::singleton(255).is_singleton());
        assert!(!CharSet::range(1, 2).is_singleton());
        assert_eq!(CharSet::of([200, 7, 90]).first(), Some(7));
        assert!(CharSet::range(5, 4).is_empty());
    }

    #[test]
    fn iterates_in_ascending_order() {
        let set = CharSet::of([97, END_OF_STREAM, 32, 255, 0]);

        assert_eq!(set.iter().collect::<Vec<_>>(), vec![-1, 0, 32, 97, 255]);
        assert_eq!(set.runs(), vec![(-1, 0), (32, 32), (97, 97), (255, 255)]);
    }

    #[test]
    fn display() {
        assert_eq!(CharSet::empty().to_string(), "{}");
        assert_eq!(CharSet::range(97, 122).to_string(), "{'a'-'z'}");
        assert_eq!(
            CharSet::of([END_OF_STREAM, 10, 39, 48, 49]).to_string(),
            "{eos, 10, 39, '0'-'1'}"
        );
    }

    #[test]
    fn codes_of_text() {
        assert_eq!(codes("a b").collect::<Vec<_>>(), vec![97, 32, 98]);
    }
}
