//! Classification of a page's outcome list.

use super::core::{ParseError, ParseResult};
use serde::Serialize;

/// One discarded branch of a page parse, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub found: String,
    pub error: String,
    pub distance: usize,
}

impl From<ParseError> for ParseFailure {
    fn from(e: ParseError) -> Self {
        Self {
            found: e.found().to_string(),
            error: e.message(),
            distance: e.distance(),
        }
    }
}

/// Verdict for a single page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageParse<T> {
    /// Exactly one branch consumed the whole page.
    Success(T),
    /// Several branches consumed the whole page.
    TooMany {
        count: usize,
        failures: Vec<ParseFailure>,
    },
    /// No branch consumed the whole page.
    Failure(Vec<ParseFailure>),
}

impl<T> PageParse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, PageParse::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageParse<U> {
        match self {
            PageParse::Success(value) => PageParse::Success(f(value)),
            PageParse::TooMany { count, failures } => PageParse::TooMany { count, failures },
            PageParse::Failure(failures) => PageParse::Failure(failures),
        }
    }
}

/// Splits outcomes into successes and failures and decides the verdict.
///
/// Failures are ordered furthest first, so the most plausible branch leads
/// the report.
pub fn classify<T>(outcomes: ParseResult<T>) -> PageParse<T> {
    let mut values = Vec::new();
    let mut failures: Vec<ParseFailure> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok((_, value)) => values.push(value),
            Err(e) => failures.push(e.into()),
        }
    }
    failures.sort_by(|a, b| b.distance.cmp(&a.distance));

    match values.len() {
        0 => PageParse::Failure(failures),
        1 => match values.pop() {
            Some(value) => PageParse::Success(value),
            None => PageParse::Failure(failures),
        },
        count => PageParse::TooMany { count, failures },
    }
}
