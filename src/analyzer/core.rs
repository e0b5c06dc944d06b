//! # Parser Core
//!
//! The foundational types of the page parser: the [`Parser`] trait, the
//! outcome list it produces, and the [`ParseError`] record used to report
//! where and why a branch stopped.
//!
//! Unlike a first-match parser, every parser here returns *all* of its
//! outcomes. A grammar that is well formed for a page yields exactly one
//! successful outcome once it reaches end of input; more than one means the
//! grammar is ambiguous for that page.

use thiserror::Error;

/// A parser over a slice of input items.
///
/// # Arguments
///
/// * `input` - The full token slice of a page
/// * `pos` - Index of the next token to consume
///
/// Returns every outcome reachable from `pos`. The list is never empty.
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

impl<I, O> Parser<I, O> for Box<dyn Parser<I, O>> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.as_ref().parse(input, pos)
    }
}

/// A single branch of a parse: the position after the consumed input and the
/// produced value, or the error the branch ended with.
pub type ParseOutcome<O> = Result<(usize, O), ParseError>;

/// All branches explored by a parser.
pub type ParseResult<O> = Vec<ParseOutcome<O>>;

/// Renders an input item for error reports.
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for char {
    fn describe(&self) -> String {
        self.to_string()
    }
}

pub const EOF_PLACEHOLDER: &str = "<eof>";

/// Describes the item at `pos`, or `<eof>` past the end of input.
pub fn found_at<I: Describe>(input: &[I], pos: usize) -> String {
    input
        .get(pos)
        .map(Describe::describe)
        .unwrap_or_else(|| EOF_PLACEHOLDER.to_string())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected EOF at {position}: expected {expected}")]
    UnexpectedEOF { expected: String, position: usize },
    #[error("Unexpected token at {position}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        position: usize,
    },
    #[error("Failure at {position}: {message}, found {found}")]
    Failure {
        message: String,
        found: String,
        position: usize,
    },
}

impl ParseError {
    /// Builds the error for an item rejected at `pos`.
    pub fn unexpected<I: Describe>(expected: &str, input: &[I], pos: usize) -> Self {
        match input.get(pos) {
            Some(item) => ParseError::Unexpected {
                expected: expected.to_string(),
                found: item.describe(),
                position: pos,
            },
            None => ParseError::UnexpectedEOF {
                expected: expected.to_string(),
                position: pos,
            },
        }
    }

    pub fn failure<I: Describe>(message: impl Into<String>, input: &[I], pos: usize) -> Self {
        ParseError::Failure {
            message: message.into(),
            found: found_at(input, pos),
            position: pos,
        }
    }

    /// Token index at which the branch failed.
    pub fn distance(&self) -> usize {
        match self {
            ParseError::UnexpectedEOF { position, .. }
            | ParseError::Unexpected { position, .. }
            | ParseError::Failure { position, .. } => *position,
        }
    }

    pub fn found(&self) -> &str {
        match self {
            ParseError::UnexpectedEOF { .. } => EOF_PLACEHOLDER,
            ParseError::Unexpected { found, .. } | ParseError::Failure { found, .. } => found,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParseError::UnexpectedEOF { expected, .. }
            | ParseError::Unexpected { expected, .. } => expected.clone(),
            ParseError::Failure { message, .. } => message.clone(),
        }
    }

    /// Prefixes the message with the name of the enclosing rule.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            ParseError::UnexpectedEOF { expected, position } => ParseError::UnexpectedEOF {
                expected: format!("{context}: {expected}"),
                position,
            },
            ParseError::Unexpected {
                expected,
                found,
                position,
            } => ParseError::Unexpected {
                expected: format!("{context}: {expected}"),
                found,
                position,
            },
            ParseError::Failure {
                message,
                found,
                position,
            } => ParseError::Failure {
                message: format!("{context}: {message}"),
                found,
                position,
            },
        }
    }
}

/// Drops the failed branches of a result.
pub fn successes<O>(result: ParseResult<O>) -> impl Iterator<Item = (usize, O)> {
    result.into_iter().filter_map(Result::ok)
}

/// Continues every successful branch of `first` with `next`, combining both
/// values. Failed branches of either step are kept as they are.
pub(crate) fn continue_with<A, B, C>(
    first: ParseResult<A>,
    next: impl Fn(usize) -> ParseResult<B>,
    combine: impl Fn(A, B) -> C,
) -> ParseResult<C>
where
    A: Clone,
{
    let mut outcomes = Vec::new();
    for outcome in first {
        match outcome {
            Err(e) => outcomes.push(Err(e)),
            Ok((pos, a)) => {
                for second in next(pos) {
                    outcomes.push(second.map(|(end, b)| (end, combine(a.clone(), b))));
                }
            }
        }
    }
    outcomes
}
