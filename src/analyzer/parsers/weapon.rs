//! Weapon pages: the basic weapon tables, grouped by inline category titles,
//! and the rare weapon pages, one category per page banner.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::{Accuracy, DamageType, Distance, Handed, Weapon, WeaponCategory};
use crate::token::{ImageToken, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RARE_BANNER: Regex = Regex::new(r"^SAMPLE RARE (.*) WEAPONS$").unwrap();
}

const CATEGORY_SUFFIX: &str = " Category";

/// A weapon row before its category is known.
#[derive(Debug, Clone)]
struct Listing {
    image: ImageToken,
    name: String,
    martial: bool,
    cost: i64,
    accuracy: Accuracy,
    damage: i64,
    damage_type: DamageType,
    hands: Handed,
    melee: Distance,
    description: String,
}

impl Listing {
    fn into_weapon(self, category: WeaponCategory) -> Weapon {
        Weapon {
            image: self.image,
            name: self.name,
            martial: self.martial,
            cost: self.cost,
            accuracy: self.accuracy,
            damage: self.damage,
            damage_type: self.damage_type,
            hands: self.hands,
            melee: self.melee,
            category,
            description: self.description,
        }
    }
}

fn parse_listing() -> impl Parser<Token, Listing> {
    with_context(
        map(
            tuple2(
                tuple6(
                    parse_image(),
                    parse_text(),
                    parse_martial(),
                    parse_cost(),
                    parse_accuracy(),
                    parse_damage(),
                ),
                tuple4(
                    parse_damage_type(),
                    terminated(parse_hands(), parse_sep()),
                    terminated(parse_distance(), parse_sep()),
                    parse_description(),
                ),
            ),
            |(
                (image, name, martial, cost, accuracy, damage),
                (damage_type, hands, melee, description),
            )| Listing {
                image,
                name,
                martial,
                cost,
                accuracy,
                damage,
                damage_type,
                hands,
                melee,
                description,
            },
        ),
        "weapon",
    )
}

fn is_category_title(s: &str) -> bool {
    s.ends_with(CATEGORY_SUFFIX)
}

/// `Sword Category`
fn parse_category_title() -> impl Parser<Token, WeaponCategory> {
    and_then(
        parse_text_where("category title", |t| is_category_title(&t.text)),
        |title: String| {
            let word = title.strip_suffix(CATEGORY_SUFFIX).unwrap_or(&title);
            WeaponCategory::from_title(word)
        },
    )
}

fn parse_category_section() -> impl Parser<Token, Vec<Weapon>> {
    map(
        tuple2(parse_category_title(), many1(parse_listing())),
        |(category, listings)| {
            listings
                .into_iter()
                .map(|listing| listing.into_weapon(category))
                .collect::<Vec<_>>()
        },
    )
}

fn parse_basic_ending() -> impl Parser<Token, ()> {
    alt(
        map(tuple2(parse_exact("BASIC WEAPONS"), parse_text()), |_| ()),
        map(parse_text(), |_| ()),
    )
}

/// Basic weapon tables.
pub fn parse_basic_weapons_page() -> impl Parser<Token, Vec<Weapon>> {
    with_context(
        map(
            tuple4(
                tuple3(
                    parse_image(),
                    parse_image(),
                    many1(parse_text_where("page title", |t| !is_category_title(&t.text))),
                ),
                many1(parse_category_section()),
                parse_basic_ending(),
                eof(),
            ),
            |(_, sections, _, _)| sections.into_iter().flatten().collect::<Vec<_>>(),
        ),
        "basic weapons page",
    )
}

/// `SAMPLE RARE SWORD WEAPONS`
fn parse_rare_banner() -> impl Parser<Token, WeaponCategory> {
    and_then(
        parse_text_where("rare weapons banner", |t| RARE_BANNER.is_match(&t.text)),
        |banner: String| {
            let word = RARE_BANNER
                .captures(&banner)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            WeaponCategory::from_title(&word)
        },
    )
}

/// Sample rare weapons of a single category.
pub fn parse_rare_weapons_page() -> impl Parser<Token, Vec<Weapon>> {
    with_context(
        map(
            tuple5(
                tuple3(
                    parse_image(),
                    parse_image(),
                    many1(parse_text_where("page title", |t| {
                        !RARE_BANNER.is_match(&t.text)
                    })),
                ),
                parse_rare_banner(),
                many1(parse_text()),
                many1(parse_listing()),
                tuple2(parse_text(), eof()),
            ),
            |(_, category, _, listings, _)| {
                listings
                    .into_iter()
                    .map(|listing| listing.into_weapon(category))
                    .collect::<Vec<_>>()
            },
        ),
        "rare weapons page",
    )
}
