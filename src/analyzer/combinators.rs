//! # Parser Combinators
//!
//! Building blocks of the page grammars. Every combinator keeps the full
//! outcome list of its children, so ambiguity surfaces at the top of a
//! grammar instead of being resolved by the first matching branch.
//!
//! ## Combinator Types
//!
//! * **Basic Combinators**: `Zero`, `Satisfy`, `Eof`
//! * **Sequential Combinators**: `Tuple2`..`Tuple6`, `Preceded`, `Terminated`
//! * **Alternative Combinators**: `Choice`
//! * **Repetition Combinators**: `Many`, `Many1`
//! * **Transformation Combinators**: `Map`, `AndThen`
//! * **Error Handling Combinators**: `WithContext`

use super::core::{continue_with, successes, Describe, ParseError, ParseResult, Parser};
use std::marker::PhantomData;

/// Zero: always succeeds with a fixed value without consuming input.
#[derive(Clone)]
pub struct Zero<I, O> {
    zero_value: O,
    _phantom: PhantomData<I>,
}

impl<I, O> Zero<I, O> {
    pub fn new(zero_value: O) -> Self {
        Self {
            zero_value,
            _phantom: PhantomData,
        }
    }
}

impl<I, O: Clone> Parser<I, O> for Zero<I, O> {
    fn parse(&self, _input: &[I], pos: usize) -> ParseResult<O> {
        vec![Ok((pos, self.zero_value.clone()))]
    }
}

/// Satisfy: consumes one item if the predicate accepts it.
///
/// The predicate returns the produced value, so matching and extraction
/// happen in a single step.
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    f: F,
    label: String,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    /// Creates a new Satisfy parser
    ///
    /// # Arguments
    ///
    /// * `f` - Maps an accepted item to the produced value
    /// * `label` - Reported as the expectation when the item is rejected
    pub fn new(f: F, label: &str) -> Self {
        Self {
            f,
            label: label.to_string(),
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    I: Describe,
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        match input.get(pos).and_then(|item| (self.f)(item)) {
            Some(value) => vec![Ok((pos + 1, value))],
            None => vec![Err(ParseError::unexpected(&self.label, input, pos))],
        }
    }
}

/// Eof: succeeds only when no input remains.
#[derive(Clone)]
pub struct Eof<I> {
    _phantom: PhantomData<I>,
}

impl<I> Eof<I> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<I> Default for Eof<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Describe> Parser<I, ()> for Eof<I> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<()> {
        if pos >= input.len() {
            vec![Ok((pos, ()))]
        } else {
            vec![Err(ParseError::unexpected("eof", input, pos))]
        }
    }
}

/// Choice: runs every alternative and concatenates their outcomes.
pub struct Choice<I, O> {
    parsers: Vec<Box<dyn Parser<I, O>>>,
}

impl<I, O> Choice<I, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<I, O>>>) -> Self {
        Self { parsers }
    }
}

impl<I, O> Parser<I, O> for Choice<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parsers
            .iter()
            .flat_map(|parser| parser.parse(input, pos))
            .collect()
    }
}

/// Map: transforms the value of every successful outcome.
#[derive(Clone)]
pub struct Map<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> Map<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<P, F, A, B, I> Parser<I, B> for Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .into_iter()
            .map(|outcome| outcome.map(|(end, value)| (end, (self.f)(value))))
            .collect()
    }
}

/// AndThen: transforms successful values with a fallible function.
///
/// A rejected value turns its branch into a failure located where the inner
/// parser started, so closed-set validation reports the offending token.
#[derive(Clone)]
pub struct AndThen<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> AndThen<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<P, F, A, B, I> Parser<I, B> for AndThen<P, F, A, B>
where
    I: Describe,
    P: Parser<I, A>,
    F: Fn(A) -> Result<B, String>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .into_iter()
            .map(|outcome| {
                let (end, value) = outcome?;
                (self.f)(value)
                    .map(|mapped| (end, mapped))
                    .map_err(|message| ParseError::failure(message, input, pos))
            })
            .collect()
    }
}

/// Preceded: runs two parsers in sequence and keeps the second value.
#[derive(Clone)]
pub struct Preceded<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Preceded<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, O2> for Preceded<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O2> {
        let first: ParseResult<()> = self
            .parser1
            .parse(input, pos)
            .into_iter()
            .map(|outcome| outcome.map(|(end, _)| (end, ())))
            .collect();
        continue_with(first, |next| self.parser2.parse(input, next), |_, b| b)
    }
}

/// Terminated: runs two parsers in sequence and keeps the first value.
#[derive(Clone)]
pub struct Terminated<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Terminated<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, O1> for Terminated<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    O1: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O1> {
        continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, _| a,
        )
    }
}

/// Collects every greedy repetition of `parser` starting at `pos`.
///
/// Only successful outcomes are continued. When the parser cannot match, the
/// repetition ends with the items collected so far and the errors at the
/// stopping point are discarded.
fn repeat<P, I, O>(parser: &P, input: &[I], pos: usize) -> Vec<(usize, Vec<O>)>
where
    P: Parser<I, O>,
    O: Clone,
{
    let matched: Vec<(usize, O)> = successes(parser.parse(input, pos)).collect();
    extend(parser, input, pos, matched)
}

/// Continues each matched item with the rest of the repetition.
fn extend<P, I, O>(
    parser: &P,
    input: &[I],
    pos: usize,
    matched: Vec<(usize, O)>,
) -> Vec<(usize, Vec<O>)>
where
    P: Parser<I, O>,
    O: Clone,
{
    if matched.is_empty() {
        tracing::trace!(target: "parser::many", position = pos, "repetition stopped");
        return vec![(pos, Vec::new())];
    }

    let mut outcomes = Vec::new();
    for (next, value) in matched {
        if next == pos {
            tracing::warn!(
                target: "parser::many",
                position = pos,
                "repeated parser succeeded without consuming input"
            );
            outcomes.push((pos, vec![value]));
            continue;
        }
        for (end, rest) in repeat(parser, input, next) {
            let mut items = Vec::with_capacity(rest.len() + 1);
            items.push(value.clone());
            items.extend(rest);
            outcomes.push((end, items));
        }
    }
    outcomes
}

/// Like [`repeat`], but the errors of the first item tried are kept next to
/// the repetitions, so a list entry that fails partway is still reported.
fn repeat_reporting<P, I, O>(parser: &P, input: &[I], pos: usize) -> ParseResult<Vec<O>>
where
    P: Parser<I, O>,
    O: Clone,
{
    let mut outcomes: ParseResult<Vec<O>> = Vec::new();
    let mut matched = Vec::new();
    for outcome in parser.parse(input, pos) {
        match outcome {
            Ok(value) => matched.push(value),
            Err(e) => outcomes.push(Err(e)),
        }
    }
    outcomes.extend(extend(parser, input, pos, matched).into_iter().map(Ok));
    outcomes
}

/// Many: zero or more greedy repetitions.
#[derive(Clone)]
pub struct Many<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, Vec<O>> for Many<P, I, O>
where
    P: Parser<I, O>,
    O: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        repeat_reporting(&self.parser, input, pos)
    }
}

/// Many1: one or more greedy repetitions.
///
/// Errors of the first and second items tried are reported.
#[derive(Clone)]
pub struct Many1<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many1<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, Vec<O>> for Many1<P, I, O>
where
    P: Parser<I, O>,
    O: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        continue_with(
            self.parser.parse(input, pos),
            |next| repeat_reporting(&self.parser, input, next),
            |first, rest| {
                let mut items = Vec::with_capacity(rest.len() + 1);
                items.push(first);
                items.extend(rest);
                items
            },
        )
    }
}

/// Tuple2: sequential composition of two parsers.
#[derive(Clone)]
pub struct Tuple2<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Tuple2<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, (O1, O2)> for Tuple2<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    O1: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2)> {
        continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, b| (a, b),
        )
    }
}

/// Tuple3: sequential composition of three parsers.
#[derive(Clone)]
pub struct Tuple3<P1, P2, P3, I, O1, O2, O3> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    _phantom: PhantomData<(I, O1, O2, O3)>,
}

impl<P1, P2, P3, I, O1, O2, O3> Tuple3<P1, P2, P3, I, O1, O2, O3> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, I, O1, O2, O3> Parser<I, (O1, O2, O3)> for Tuple3<P1, P2, P3, I, O1, O2, O3>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    O1: Clone,
    O2: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3)> {
        let first = continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, b| (a, b),
        );
        continue_with(
            first,
            |next| self.parser3.parse(input, next),
            |(a, b), c| (a, b, c),
        )
    }
}

/// Tuple4: sequential composition of four parsers.
#[derive(Clone)]
pub struct Tuple4<P1, P2, P3, P4, I, O1, O2, O3, O4> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    parser4: P4,
    _phantom: PhantomData<(I, O1, O2, O3, O4)>,
}

impl<P1, P2, P3, P4, I, O1, O2, O3, O4> Tuple4<P1, P2, P3, P4, I, O1, O2, O3, O4> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3, parser4: P4) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            parser4,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, P4, I, O1, O2, O3, O4> Parser<I, (O1, O2, O3, O4)>
    for Tuple4<P1, P2, P3, P4, I, O1, O2, O3, O4>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    P4: Parser<I, O4>,
    O1: Clone,
    O2: Clone,
    O3: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3, O4)> {
        let first = continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, b| (a, b),
        );
        let second = continue_with(
            first,
            |next| self.parser3.parse(input, next),
            |(a, b), c| (a, b, c),
        );
        continue_with(
            second,
            |next| self.parser4.parse(input, next),
            |(a, b, c), d| (a, b, c, d),
        )
    }
}

/// Tuple5: sequential composition of five parsers.
#[derive(Clone)]
pub struct Tuple5<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    parser4: P4,
    parser5: P5,
    _phantom: PhantomData<(I, O1, O2, O3, O4, O5)>,
}

impl<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5> Tuple5<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3, parser4: P4, parser5: P5) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            parser4,
            parser5,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5> Parser<I, (O1, O2, O3, O4, O5)>
    for Tuple5<P1, P2, P3, P4, P5, I, O1, O2, O3, O4, O5>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    P4: Parser<I, O4>,
    P5: Parser<I, O5>,
    O1: Clone,
    O2: Clone,
    O3: Clone,
    O4: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3, O4, O5)> {
        let first = continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, b| (a, b),
        );
        let second = continue_with(
            first,
            |next| self.parser3.parse(input, next),
            |(a, b), c| (a, b, c),
        );
        let third = continue_with(
            second,
            |next| self.parser4.parse(input, next),
            |(a, b, c), d| (a, b, c, d),
        );
        continue_with(
            third,
            |next| self.parser5.parse(input, next),
            |(a, b, c, d), e| (a, b, c, d, e),
        )
    }
}

/// Tuple6: sequential composition of six parsers.
#[derive(Clone)]
pub struct Tuple6<P1, P2, P3, P4, P5, P6, I, O1, O2, O3, O4, O5, O6> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    parser4: P4,
    parser5: P5,
    parser6: P6,
    _phantom: PhantomData<(I, O1, O2, O3, O4, O5, O6)>,
}

impl<P1, P2, P3, P4, P5, P6, I, O1, O2, O3, O4, O5, O6>
    Tuple6<P1, P2, P3, P4, P5, P6, I, O1, O2, O3, O4, O5, O6>
{
    pub fn new(
        parser1: P1,
        parser2: P2,
        parser3: P3,
        parser4: P4,
        parser5: P5,
        parser6: P6,
    ) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            parser4,
            parser5,
            parser6,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, P4, P5, P6, I, O1, O2, O3, O4, O5, O6> Parser<I, (O1, O2, O3, O4, O5, O6)>
    for Tuple6<P1, P2, P3, P4, P5, P6, I, O1, O2, O3, O4, O5, O6>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
    P4: Parser<I, O4>,
    P5: Parser<I, O5>,
    P6: Parser<I, O6>,
    O1: Clone,
    O2: Clone,
    O3: Clone,
    O4: Clone,
    O5: Clone,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3, O4, O5, O6)> {
        let first = continue_with(
            self.parser1.parse(input, pos),
            |next| self.parser2.parse(input, next),
            |a, b| (a, b),
        );
        let second = continue_with(
            first,
            |next| self.parser3.parse(input, next),
            |(a, b), c| (a, b, c),
        );
        let third = continue_with(
            second,
            |next| self.parser4.parse(input, next),
            |(a, b, c), d| (a, b, c, d),
        );
        let fourth = continue_with(
            third,
            |next| self.parser5.parse(input, next),
            |(a, b, c, d), e| (a, b, c, d, e),
        );
        continue_with(
            fourth,
            |next| self.parser6.parse(input, next),
            |(a, b, c, d, e), f| (a, b, c, d, e, f),
        )
    }
}

/// WithContext: prefixes the errors of the inner parser with a rule name.
#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<P, I, O, C> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
    C: AsRef<str>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .into_iter()
            .map(|outcome| outcome.map_err(|e| e.with_context(self.context.as_ref())))
            .collect()
    }
}
