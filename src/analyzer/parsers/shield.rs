//! Shield pages.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::Shield;
use crate::token::Token;

pub fn parse_shield() -> impl Parser<Token, Shield> {
    with_context(
        map(
            tuple2(
                tuple4(parse_image(), parse_text(), parse_martial(), parse_cost()),
                tuple4(
                    parse_dash_or_number("def"),
                    parse_dash_or_number("mdef"),
                    parse_dash_or_number("initiative"),
                    parse_description(),
                ),
            ),
            |((image, name, martial, cost), (def, mdef, init, description))| Shield {
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
        "shield",
    )
}

/// Shield pages may close with a captioned illustration.
fn parse_shield_trailer() -> impl Parser<Token, ()> {
    alt(
        map(
            tuple3(parse_text(), parse_text(), many1(parse_image())),
            |_| (),
        ),
        zero(()),
    )
}

pub fn parse_shield_page() -> impl Parser<Token, Vec<Shield>> {
    with_context(
        map(
            tuple5(
                parse_starting(),
                many1(parse_shield()),
                parse_shield_trailer(),
                parse_watermark(),
                eof(),
            ),
            |(_, shields, _, _, _)| shields,
        ),
        "shield page",
    )
}
