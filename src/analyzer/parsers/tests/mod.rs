//! Page grammar tests.
//!
//! Pages are rendered to token streams the way the rulebook lexes them and
//! parsed back. Helpers here build the recurring token shapes.

mod beast_test;
mod consumable_test;
mod equipment_test;

use crate::model::{Accuracy, Stat};
use crate::token::{ImageToken, Token};
use proptest::prelude::*;

pub fn body(s: &str) -> Token {
    Token::text(s, "FBDLWO+PTSans-Narrow")
}

pub fn plain(s: &str) -> Token {
    Token::text(s, "")
}

pub fn glyph(s: &str, font: &str) -> Token {
    Token::text(s, format!("ABCDEF+{font}"))
}

pub fn sep() -> Token {
    Token::text("w", "XFYKOE+Wingdings-Regular")
}

pub fn watermark() -> Token {
    Token::text("", "Helvetica")
}

pub fn image() -> Token {
    Token::image(64.0, 64.0)
}

pub fn image_token() -> ImageToken {
    ImageToken::new(64.0, 64.0)
}

/// Banner image, title image and an empty title line.
pub fn starting() -> Vec<Token> {
    vec![image(), image(), plain("")]
}

pub fn cost(value: i64) -> Token {
    body(&format!("{value} z"))
}

pub fn accuracy(accuracy: &Accuracy) -> Vec<Token> {
    let mut tokens = vec![
        plain("【"),
        plain(&format!("{} + {}", accuracy.primary, accuracy.secondary)),
        plain("】"),
    ];
    if accuracy.bonus > 0 {
        tokens.push(plain(&format!("+{}", accuracy.bonus)));
    }
    tokens
}

pub fn damage(value: i64) -> Vec<Token> {
    vec![plain("【"), plain(&format!("HR + {value}")), plain("】")]
}

/// A wrapped paragraph: non-terminal lines and a closing sentence.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub lines: Vec<String>,
}

impl Paragraph {
    pub fn tokens(&self) -> Vec<Token> {
        self.lines.iter().map(|line| body(line)).collect()
    }

    pub fn text(&self) -> String {
        crate::analyzer::parsers::prettify(&self.lines)
    }
}

pub fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// A wrapped line that may open with closing punctuation, as the renderer
/// breaks lines before `,` and `)`.
fn continuation() -> impl Strategy<Value = String> {
    prop_oneof![
        word(),
        word().prop_map(|w| format!(", {w}")),
        word().prop_map(|w| format!(") {w}")),
        word().prop_map(|w| format!("({w}")),
    ]
}

/// The closing line of a paragraph, possibly a lone terminator.
fn sentence_end() -> impl Strategy<Value = String> {
    prop_oneof![
        word().prop_map(|w| format!("{w}.")),
        word().prop_map(|w| format!("{w}!")),
        word().prop_map(|w| format!("{w}?")),
        word().prop_map(|w| format!("), {w}.")),
        Just(".".to_string()),
        Just("!".to_string()),
    ]
}

pub fn paragraph() -> impl Strategy<Value = Paragraph> {
    (
        prop::option::of(word()),
        prop::collection::vec(continuation(), 0..3),
        sentence_end(),
    )
        .prop_map(|(head, body, end)| {
            let mut lines: Vec<String> = head.into_iter().collect();
            if !lines.is_empty() {
                lines.extend(body);
            }
            lines.push(end);
            Paragraph { lines }
        })
}

pub fn stat() -> impl Strategy<Value = Stat> {
    prop::sample::select(vec![Stat::Dex, Stat::Ins, Stat::Mig, Stat::Wlp])
}

pub fn accuracy_strategy() -> impl Strategy<Value = Accuracy> {
    (stat(), stat(), 0i64..4).prop_map(|(primary, secondary, bonus)| Accuracy {
        primary,
        secondary,
        bonus,
    })
}
