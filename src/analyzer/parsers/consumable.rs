//! The consumables page: subcategory headers, each followed by its items.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::{Consumable, ConsumableGroup};
use crate::token::{fonts, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IP_COST: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref HEADER: Regex = Regex::new(r"^[^.?!]*$").unwrap();
}

pub fn parse_consumable() -> impl Parser<Token, Consumable> {
    with_context(
        map(
            tuple4(
                parse_image(),
                many1(parse_text_where("consumable name", |t| !IP_COST.is_match(&t.text))),
                parse_number_matching(&IP_COST, "ipCost"),
                parse_description(),
            ),
            |(image, name, ip_cost, description)| Consumable {
                image,
                name: name.join(" "),
                ip_cost,
                description,
            },
        ),
        "consumable",
    )
}

/// The text run before a group's first item. Page titles share the run of
/// the first group, so the subcategory is its last line.
fn parse_group_header() -> impl Parser<Token, String> {
    and_then(
        many1(parse_text_where("header", |t| {
            !t.font_ends_with(fonts::WATERMARK)
        })),
        |mut lines: Vec<String>| {
            let last = lines.pop().unwrap_or_default();
            if HEADER.is_match(&last) {
                Ok(last)
            } else {
                Err(format!("Unexpected header {last}"))
            }
        },
    )
}

fn parse_group() -> impl Parser<Token, ConsumableGroup> {
    map(
        tuple2(parse_group_header(), many1(parse_consumable())),
        |(category, items)| ConsumableGroup { category, items },
    )
}

pub fn parse_consumables_page() -> impl Parser<Token, Vec<ConsumableGroup>> {
    with_context(
        map(
            tuple5(
                tuple2(parse_image(), parse_image()),
                many1(parse_group()),
                parse_text(),
                parse_watermark(),
                eof(),
            ),
            |(_, groups, _, _, _)| groups,
        ),
        "consumables page",
    )
}
