//! The located syntax tree of a scanner definition, as produced by the
//! definition-language parser and consumed by [`translate`](crate::translate).

use std::fmt::{Display, Formatter};

/// A position in the definition source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Character offset from the start of the source, from 0.
    pub offset: usize,
    /// Line number, from 1.
    pub line: usize,
    /// Column number, from 1.
    pub column: usize,
}

/// Where a piece of syntax sits in the source: one position or a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Coordinate(Coordinate),
    Range(Coordinate, Coordinate),
}

impl Location {
    pub fn at(offset: usize, line: usize, column: usize) -> Self {
        Location::Coordinate(Coordinate {
            offset,
            line,
            column,
        })
    }

    pub fn range(
        (offset, line, column): (usize, usize, usize),
        (end_offset, end_line, end_column): (usize, usize, usize),
    ) -> Self {
        Location::Range(
            Coordinate {
                offset,
                line,
                column,
            },
            Coordinate {
                offset: end_offset,
                line: end_line,
                column: end_column,
            },
        )
    }

    pub fn start(&self) -> Coordinate {
        match self {
            Location::Coordinate(c) | Location::Range(c, _) => *c,
        }
    }

    pub fn end(&self) -> Coordinate {
        match self {
            Location::Coordinate(c) | Location::Range(_, c) => *c,
        }
    }

    /// The span from the start of `self` to the end of `other`.
    pub fn combine(&self, other: &Location) -> Location {
        let (start, end) = (self.start(), other.end());
        if start == end {
            Location::Coordinate(start)
        } else {
            Location::Range(start, end)
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Coordinate(c) => write!(f, "{c}"),
            Location::Range(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub location: Location,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// The `extend "..."` clause, always an [`Expr::LiteralString`].
    pub extend: Option<Expr>,
    pub tokens: Vec<(Identifier, Expr)>,
    pub comments: Vec<Comment>,
    pub whitespace: Option<Expr>,
    pub fragments: Vec<(Identifier, Expr)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    Line {
        pattern: Expr,
    },
    Block {
        location: Location,
        open: Expr,
        close: Expr,
        nested: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `chr(n)`
    Chr { location: Location, code: i64 },
    /// `'c'`
    LiteralCharacter { location: Location, value: char },
    /// `"text"`, without the quotes.
    LiteralString { location: Location, value: String },
    /// `(e)`
    Paren { location: Location, value: Box<Expr> },
    /// `{e}`
    Many { location: Location, value: Box<Expr> },
    /// `[e]`
    Optional { location: Location, value: Box<Expr> },
    /// A reference to a fragment.
    Identifier(Identifier),
    /// `from to to`
    Range {
        location: Location,
        from: Box<Expr>,
        to: Box<Expr>,
    },
    /// `!e`
    Not { location: Location, value: Box<Expr> },
    /// `source - extract`
    Minus {
        location: Location,
        source: Box<Expr>,
        extract: Box<Expr>,
    },
    /// `a + b + ...`
    Union { location: Location, values: Vec<Expr> },
    /// `a b ...`
    Sequence { location: Location, values: Vec<Expr> },
    /// `a | b | ...`
    Alternative { location: Location, values: Vec<Expr> },
}

impl Expr {
    pub fn location(&self) -> Location {
        match self {
            Expr::Identifier(identifier) => identifier.location,
            Expr::Chr { location, .. }
            | Expr::LiteralCharacter { location, .. }
            | Expr::LiteralString { location, .. }
            | Expr::Paren { location, .. }
            | Expr::Many { location, .. }
            | Expr::Optional { location, .. }
            | Expr::Range { location, .. }
            | Expr::Not { location, .. }
            | Expr::Minus { location, .. }
            | Expr::Union { location, .. }
            | Expr::Sequence { location, .. }
            | Expr::Alternative { location, .. } => *location,
        }
    }
}

/// The span covering the first through the last of `values`.
pub fn location_of(values: &[Expr]) -> Option<Location> {
    let first = values.first()?;
    let last = values.last()?;
    Some(first.location().combine(&last.location()))
}
