//! Translates a parsed [`ast::Definition`] into a [`Definition`], resolving
//! fragment references and folding character-class operators into [`CharSet`]s.

use crate::ast::{self, Expr, Location};
use crate::definition::{Comment, Definition, Fragment};
use scanpiler_automata::{CharSet, RegEx, END_OF_STREAM, MAX_CHAR};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("chr argument of {code} must be in the range -1..255 at {location}")]
    ChrOutOfRange { location: Location, code: i64 },
    #[error("whitespace must be a character class rather than a regular expression at {location}")]
    CommentNotCharacterClass { location: Location },
    #[error("Fragment {name} is already defined at {location}")]
    DuplicateFragmentName { location: Location, name: String },
    #[error("Token {name} is already defined at {location}")]
    DuplicateTokenName { location: Location, name: String },
    #[error("Feature \"{nature}\" is not yet implemented at {location}")]
    FeatureNotImplemented { location: Location, nature: String },
    #[error("Minus operator applies only to character class expressions rather than regular expressions at {location}")]
    MinusOperandNotCharacterClass { location: Location },
    #[error("Not operator applies only to a character class expression rather than to a regular expression at {location}")]
    NotExpectsCharacterClass { location: Location },
    #[error("Range operator applies only to character class expressions rather than regular expressions at {location}")]
    RangeOperandNotCharacters { location: Location },
    #[error("Union operator applies only to character class expressions rather than regular expressions at {location}")]
    UnionOperandNotCharacterClass { location: Location },
    #[error("Unknown fragment {name} at {location}")]
    UnknownFragmentIdentifier { location: Location, name: String },
}

impl TranslateError {
    pub fn location(&self) -> Location {
        match self {
            TranslateError::ChrOutOfRange { location, .. }
            | TranslateError::CommentNotCharacterClass { location }
            | TranslateError::DuplicateFragmentName { location, .. }
            | TranslateError::DuplicateTokenName { location, .. }
            | TranslateError::FeatureNotImplemented { location, .. }
            | TranslateError::MinusOperandNotCharacterClass { location }
            | TranslateError::NotExpectsCharacterClass { location }
            | TranslateError::RangeOperandNotCharacters { location }
            | TranslateError::UnionOperandNotCharacterClass { location }
            | TranslateError::UnknownFragmentIdentifier { location, .. } => *location,
        }
    }
}

/// Translates `ast`, reporting every error found rather than stopping at the first.
///
/// Fragments are translated before anything else, so tokens and comments may
/// refer to fragments declared after them.
pub fn translate(ast: &ast::Definition) -> Result<Definition, Vec<TranslateError>> {
    let mut translator = Translate {
        ast,
        definition: Definition::new(),
        errors: Vec::new(),
    };
    translator.process();

    let Translate {
        definition, errors, ..
    } = translator;
    if errors.is_empty() {
        log::debug!(
            "translated definition with {} tokens and {} comments",
            definition.tokens.len(),
            definition.comments.len()
        );
        Ok(definition)
    } else {
        log::debug!("translation failed with {} errors", errors.len());
        Err(errors)
    }
}

struct Translate<'a> {
    ast: &'a ast::Definition,
    definition: Definition,
    errors: Vec<TranslateError>,
}

impl Translate<'_> {
    fn process(&mut self) {
        let ast = self.ast;
        if let Some(extend) = &ast.extend {
            self.errors.push(TranslateError::FeatureNotImplemented {
                location: extend.location(),
                nature: "Extending a lexical definition".to_string(),
            });
        }

        self.translate_fragments();
        self.translate_tokens();
        self.translate_comments();
        self.translate_whitespace();
    }

    fn translate_fragments(&mut self) {
        let ast = self.ast;
        for (name, expr) in &ast.fragments {
            if self.definition.has_fragment(&name.id) {
                self.errors.push(TranslateError::DuplicateFragmentName {
                    location: name.location,
                    name: name.id.clone(),
                });
            } else if let Some(fragment) = self.translate_expr(expr) {
                // cannot collide: checked above
                let _ = self.definition.add_fragment(name.id.clone(), fragment);
            }
        }
    }

    fn translate_tokens(&mut self) {
        let ast = self.ast;
        for (name, expr) in &ast.tokens {
            let pattern = self.translate_expr_as_regex(expr);

            if self.definition.has_token(&name.id) {
                self.errors.push(TranslateError::DuplicateTokenName {
                    location: name.location,
                    name: name.id.clone(),
                });
            } else if let Some(pattern) = pattern {
                // cannot collide: checked above
                let _ = self.definition.add_token(name.id.clone(), pattern, None);
            }
        }
    }

    fn translate_comments(&mut self) {
        let ast = self.ast;
        for comment in &ast.comments {
            if let Some(comment) = self.translate_comment(comment) {
                self.definition.add_comment(comment);
            }
        }
    }

    fn translate_comment(&mut self, comment: &ast::Comment) -> Option<Comment> {
        match comment {
            ast::Comment::Line { pattern } => {
                let pattern = self.translate_expr_as_regex(pattern)?;
                Some(Comment::Line { pattern })
            }
            ast::Comment::Block {
                open,
                close,
                nested,
                ..
            } => {
                let open = self.translate_expr_as_regex(open);
                let close = self.translate_expr_as_regex(close);
                Some(Comment::Block {
                    open: open?,
                    close: close?,
                    nested: *nested,
                })
            }
        }
    }

    fn translate_whitespace(&mut self) {
        let ast = self.ast;
        let Some(expr) = &ast.whitespace else {
            return;
        };

        match self.translate_expr(expr) {
            Some(Fragment::CharSet(whitespace)) => {
                self.definition.set_whitespace(whitespace);
            }
            Some(Fragment::RegEx(_)) => self.errors.push(TranslateError::CommentNotCharacterClass {
                location: expr.location(),
            }),
            None => {}
        }
    }

    fn translate_expr_as_regex(&mut self, e: &Expr) -> Option<RegEx> {
        self.translate_expr(e).map(Fragment::into_regex)
    }

    fn translate_expr(&mut self, e: &Expr) -> Option<Fragment> {
        match e {
            Expr::Chr { location, code } => self.translate_chr(*location, *code).map(Fragment::CharSet),
            Expr::LiteralCharacter { location, value } => self
                .translate_chr(*location, u32::from(*value).into())
                .map(Fragment::CharSet),
            Expr::LiteralString { location, value } => self.translate_literal_string(*location, value),
            Expr::Paren { value, .. } => self.translate_expr(value),
            Expr::Many { value, .. } => self
                .translate_expr_as_regex(value)
                .map(|r| Fragment::RegEx(RegEx::many(r))),
            Expr::Optional { value, .. } => self
                .translate_expr_as_regex(value)
                .map(|r| Fragment::RegEx(RegEx::optional(r))),
            Expr::Identifier(identifier) => self.translate_identifier_reference(identifier),
            Expr::Range { from, to, .. } => self.translate_range(from, to).map(Fragment::CharSet),
            Expr::Not { location, value } => self.translate_not(*location, value).map(Fragment::CharSet),
            Expr::Minus { source, extract, .. } => self.translate_minus(source, extract).map(Fragment::CharSet),
            Expr::Union { values, .. } => Some(Fragment::CharSet(self.translate_union(values))),
            Expr::Sequence { values, .. } => {
                let values: Vec<RegEx> = values
                    .iter()
                    .filter_map(|value| self.translate_expr_as_regex(value))
                    .collect();
                Some(Fragment::RegEx(RegEx::Sequence(values)))
            }
            Expr::Alternative { values, .. } => {
                let values: Vec<RegEx> = values
                    .iter()
                    .filter_map(|value| self.translate_expr_as_regex(value))
                    .collect();
                Some(Fragment::RegEx(RegEx::Alternative(values)))
            }
        }
    }

    fn translate_chr(&mut self, location: Location, code: i64) -> Option<CharSet> {
        if code < i64::from(END_OF_STREAM) || code > i64::from(MAX_CHAR) {
            self.errors
                .push(TranslateError::ChrOutOfRange { location, code });
            None
        } else {
            Some(CharSet::singleton(code as i32))
        }
    }

    fn translate_literal_string(&mut self, location: Location, value: &str) -> Option<Fragment> {
        match value.chars().map(u32::from).find(|&c| c > MAX_CHAR as u32) {
            Some(code) => {
                self.errors.push(TranslateError::ChrOutOfRange {
                    location,
                    code: code.into(),
                });
                None
            }
            None => Some(Fragment::RegEx(RegEx::literal(value))),
        }
    }

    fn translate_identifier_reference(&mut self, identifier: &ast::Identifier) -> Option<Fragment> {
        let fragment = self.definition.fragment(&identifier.id).cloned();
        if fragment.is_none() {
            self.errors.push(TranslateError::UnknownFragmentIdentifier {
                location: identifier.location,
                name: identifier.id.clone(),
            });
        }
        fragment
    }

    /// Translates an operand that must be a character class, reporting `error` otherwise.
    fn translate_char_set_operand(
        &mut self,
        e: &Expr,
        error: fn(Location) -> TranslateError,
    ) -> Option<CharSet> {
        match self.translate_expr(e)? {
            Fragment::CharSet(cc) => Some(cc),
            Fragment::RegEx(_) => {
                self.errors.push(error(e.location()));
                None
            }
        }
    }

    fn translate_range(&mut self, from: &Expr, to: &Expr) -> Option<CharSet> {
        let from = self.translate_range_endpoint(from);
        let to = self.translate_range_endpoint(to);

        Some(CharSet::range(from?, to?))
    }

    fn translate_range_endpoint(&mut self, e: &Expr) -> Option<i32> {
        let cc = self.translate_char_set_operand(e, |location| {
            TranslateError::RangeOperandNotCharacters { location }
        })?;

        if cc.is_singleton() {
            cc.first()
        } else {
            self.errors.push(TranslateError::RangeOperandNotCharacters {
                location: e.location(),
            });
            None
        }
    }

    fn translate_not(&mut self, location: Location, value: &Expr) -> Option<CharSet> {
        match self.translate_expr(value)? {
            Fragment::CharSet(cc) => Some(CharSet::all().minus(&cc)),
            Fragment::RegEx(_) => {
                self.errors
                    .push(TranslateError::NotExpectsCharacterClass { location });
                None
            }
        }
    }

    fn translate_minus(&mut self, source: &Expr, extract: &Expr) -> Option<CharSet> {
        let error = |location: Location| TranslateError::MinusOperandNotCharacterClass { location };
        let source = self.translate_char_set_operand(source, error);
        let extract = self.translate_char_set_operand(extract, error);

        Some(source?.minus(&extract?))
    }

    fn translate_union(&mut self, values: &[Expr]) -> CharSet {
        values.iter().fold(CharSet::empty(), |result, value| {
            match self.translate_char_set_operand(value, |location| {
                TranslateError::UnionOperandNotCharacterClass { location }
            }) {
                Some(cc) => result.union(&cc),
                None => result,
            }
        })
    }
}
