//! Token-level parsers shared by every page grammar.

use super::super::{core::*, prelude::*};
use crate::model::{Accuracy, DamageType, Distance, Handed, Stat};
use crate::token::{fonts, ImageToken, TextToken, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DASH_OR_NUMBER: Regex = Regex::new(r"^([+-]?[0-9]+|-)$").unwrap();
    static ref ACCURACY_BONUS: Regex = Regex::new(r"^\+([0-9]+)$").unwrap();
    static ref DAMAGE: Regex = Regex::new(r"^HR \+ ([0-9]+)$").unwrap();
}

// Token class parsers
pub fn parse_image() -> impl Parser<Token, ImageToken> {
    satisfy(|token: &Token| token.as_image().cloned(), "image")
}

pub fn parse_text() -> impl Parser<Token, String> {
    parse_text_where("text", |_| true)
}

/// Matches a text token accepted by `f` and yields its string.
pub fn parse_text_where<F>(label: &str, f: F) -> impl Parser<Token, String>
where
    F: Fn(&TextToken) -> bool,
{
    satisfy(
        move |token: &Token| token.as_text().filter(|t| f(t)).map(|t| t.text.clone()),
        label,
    )
}

pub fn parse_text_with_font(suffixes: &'static [&'static str]) -> impl Parser<Token, String> {
    parse_text_where(&format!("text with fonts {suffixes:?}"), move |t| {
        t.font_is_any(suffixes)
    })
}

pub fn parse_exact(s: &'static str) -> impl Parser<Token, String> {
    parse_text_where(&format!("text: \"{s}\""), move |t| t.text == s)
}

pub fn parse_exact_with_font(s: &'static str, font: &'static str) -> impl Parser<Token, String> {
    parse_text_where(&format!("text: \"{s}\" with font {font}"), move |t| {
        t.text == s && t.font_ends_with(font)
    })
}

pub fn parse_matching(regex: &'static Regex, label: &str) -> impl Parser<Token, String> {
    parse_text_where(label, move |t| regex.is_match(&t.text))
}

/// The Wingdings "w" glyph printed between fields.
pub fn parse_sep() -> impl Parser<Token, String> {
    parse_exact_with_font("w", fonts::SEPARATOR)
}

pub fn parse_watermark() -> impl Parser<Token, String> {
    parse_text_where("watermark", |t| t.font_ends_with(fonts::WATERMARK))
}

/// Page banner and title block: two images followed by free text.
pub fn parse_starting() -> impl Parser<Token, ()> {
    map(
        tuple3(parse_image(), parse_image(), many1(parse_text())),
        |_| (),
    )
}

// Numeric coercions
pub fn convert_cost(s: &str) -> Option<i64> {
    if let Some(prefix) = s.strip_suffix(" z") {
        prefix.trim().parse().ok()
    } else if s == "-" {
        Some(0)
    } else {
        s.parse().ok()
    }
}

pub fn convert_dash_or_number(s: &str) -> Option<i64> {
    if s == "-" {
        Some(0)
    } else {
        s.strip_prefix('+').unwrap_or(s).parse().ok()
    }
}

pub fn parse_cost() -> impl Parser<Token, i64> {
    and_then(parse_text_with_font(&[fonts::BODY]), |s| {
        convert_cost(&s).ok_or_else(|| format!("Unexpected cost {s}"))
    })
}

pub fn parse_dash_or_number(label: &str) -> impl Parser<Token, i64> {
    and_then(parse_matching(&DASH_OR_NUMBER, label), |s: String| {
        convert_dash_or_number(&s).ok_or_else(|| format!("Invalid number {s}"))
    })
}

/// A text matching `regex` read as a whole number. Numerals too large for
/// an `i64` fail at the token instead of becoming zero.
pub fn parse_number_matching(regex: &'static Regex, label: &str) -> impl Parser<Token, i64> {
    and_then(parse_matching(regex, label), |s: String| {
        s.parse::<i64>().map_err(|_| format!("Invalid number {s}"))
    })
}

// Weapon statistics
fn parse_stat_pair() -> impl Parser<Token, (Stat, Stat)> {
    satisfy(
        |token: &Token| {
            let text = &token.as_text()?.text;
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != 9 {
                return None;
            }
            let primary: String = chars[..3].iter().collect();
            let secondary: String = chars[6..].iter().collect();
            Some((primary.parse::<Stat>().ok()?, secondary.parse::<Stat>().ok()?))
        },
        "accuracy attributes",
    )
}

fn parse_accuracy_bonus() -> impl Parser<Token, i64> {
    alt(
        satisfy(
            |token: &Token| {
                let captures = ACCURACY_BONUS.captures(&token.as_text()?.text)?;
                captures[1].parse::<i64>().ok()
            },
            "accuracy bonus",
        ),
        zero(0),
    )
}

/// `【` `DEX + MIG` `】` with an optional `+N` bonus.
pub fn parse_accuracy() -> impl Parser<Token, Accuracy> {
    with_context(
        map(
            tuple2(
                terminated(preceded(parse_exact("【"), parse_stat_pair()), parse_exact("】")),
                parse_accuracy_bonus(),
            ),
            |((primary, secondary), bonus)| Accuracy {
                primary,
                secondary,
                bonus,
            },
        ),
        "accuracy",
    )
}

/// `【` `HR + N` `】`
pub fn parse_damage() -> impl Parser<Token, i64> {
    with_context(
        terminated(
            preceded(
                parse_exact("【"),
                satisfy(
                    |token: &Token| {
                        let captures = DAMAGE.captures(&token.as_text()?.text)?;
                        captures[1].parse::<i64>().ok()
                    },
                    "damage",
                ),
            ),
            parse_exact("】"),
        ),
        "damage",
    )
}

pub fn parse_damage_type() -> impl Parser<Token, DamageType> {
    satisfy(
        |token: &Token| token.as_text()?.text.parse::<DamageType>().ok(),
        "damage type",
    )
}

pub fn parse_hands() -> impl Parser<Token, Handed> {
    alt(
        map(parse_exact("One-handed"), |_| Handed::OneHanded),
        map(parse_exact("Two-handed"), |_| Handed::TwoHanded),
    )
}

pub fn parse_distance() -> impl Parser<Token, Distance> {
    alt(
        map(parse_exact("Melee"), |_| Distance::Melee),
        map(parse_exact("Ranged"), |_| Distance::Ranged),
    )
}

/// The martial glyph, present or absent.
pub fn parse_martial() -> impl Parser<Token, bool> {
    alt(
        map(parse_exact_with_font("E", fonts::BASIC_SHAPES), |_| true),
        zero(false),
    )
}

// Descriptions
pub fn is_sentence_end(s: &str) -> bool {
    s.ends_with(['.', '?', '!'])
}

/// A line ending in sentence punctuation, in any font.
pub fn parse_description_end() -> impl Parser<Token, String> {
    parse_text_where("description end", |t| is_sentence_end(&t.text))
}

/// A wrapped line in the middle of a description.
pub fn parse_description_line() -> impl Parser<Token, String> {
    parse_text_where("description line", |t| {
        t.font_is_any(&fonts::DESCRIPTION)
            && !is_sentence_end(&t.text)
            && !t.text.starts_with("Opportunity:")
    })
}

fn parse_description_head() -> impl Parser<Token, String> {
    parse_text_where("description", |t| {
        t.font_ends_with(fonts::BODY) && !is_sentence_end(&t.text)
    })
}

/// A paragraph wrapped over several lines, ending at the first line that
/// closes a sentence.
pub fn parse_description() -> impl Parser<Token, String> {
    alt(
        map(
            tuple3(
                parse_description_head(),
                many(parse_description_line()),
                parse_description_end(),
            ),
            |(head, body, end)| {
                let mut lines = Vec::with_capacity(body.len() + 2);
                lines.push(head);
                lines.extend(body);
                lines.push(end);
                prettify(&lines)
            },
        ),
        map(parse_description_end(), |end| prettify(&[end])),
    )
}

/// Joins wrapped lines into one paragraph. Lines opening with closing
/// punctuation attach to the previous line without a space.
pub fn prettify<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines.iter().fold(String::new(), |mut acc, line| {
        let s = line.as_ref().trim();
        if !s.starts_with(['.', '?', '!', ')', ',']) {
            acc.push(' ');
        }
        acc.push_str(s);
        acc
    });
    joined.trim().to_string()
}
