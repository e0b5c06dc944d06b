//! Accessory pages.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::Accessory;
use crate::token::Token;

pub fn parse_accessory() -> impl Parser<Token, Accessory> {
    with_context(
        map(
            tuple4(parse_image(), parse_text(), parse_cost(), parse_description()),
            |(image, name, cost, description)| Accessory {
                image,
                name,
                cost,
                description,
            },
        ),
        "accessory",
    )
}

pub fn parse_accessory_page() -> impl Parser<Token, Vec<Accessory>> {
    with_context(
        map(
            tuple4(
                parse_starting(),
                many1(parse_accessory()),
                parse_watermark(),
                eof(),
            ),
            |(_, accessories, _, _)| accessories,
        ),
        "accessory page",
    )
}
