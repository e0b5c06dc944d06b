//! Armor pages.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::Armor;
use crate::token::Token;

/// Reads `DEX size +1`, `INS die` and plain dash-or-number defenses.
///
/// A bare `size`/`die` entry means the attribute die alone, i.e. a bonus of 0.
pub fn convert_defense(attribute: &str, s: &str) -> Option<i64> {
    let Some(rest) = s.strip_prefix(attribute) else {
        return convert_dash_or_number(s);
    };
    let bonus = rest
        .strip_prefix(" size")
        .or_else(|| rest.strip_prefix(" die"))?
        .trim();
    if bonus.is_empty() {
        Some(0)
    } else {
        convert_dash_or_number(bonus)
    }
}

fn parse_defense(attribute: &'static str) -> impl Parser<Token, i64> {
    and_then(parse_text(), move |s: String| {
        convert_defense(attribute, &s).ok_or_else(|| format!("Unexpected defense {s}"))
    })
}

/// Armor descriptions may open directly on a bold or icon line.
fn parse_armor_description() -> impl Parser<Token, String> {
    map(
        tuple2(many(parse_description_line()), parse_description_end()),
        |(mut lines, end)| {
            lines.push(end);
            prettify(&lines)
        },
    )
}

pub fn parse_armor() -> impl Parser<Token, Armor> {
    with_context(
        map(
            tuple2(
                tuple4(parse_image(), parse_text(), parse_martial(), parse_cost()),
                tuple4(
                    parse_defense("DEX"),
                    parse_defense("INS"),
                    parse_dash_or_number("initiative"),
                    parse_armor_description(),
                ),
            ),
            |((image, name, martial, cost), (def, mdef, init, description))| Armor {
                image,
                name,
                martial,
                cost,
                def,
                mdef,
                init,
                description,
            },
        ),
        "armor",
    )
}

pub fn parse_armor_page() -> impl Parser<Token, Vec<Armor>> {
    with_context(
        map(
            tuple5(
                parse_starting(),
                many1(parse_armor()),
                alt(map(parse_image(), |_| ()), zero(())),
                parse_watermark(),
                eof(),
            ),
            |(_, armors, _, _, _)| armors,
        ),
        "armor page",
    )
}
