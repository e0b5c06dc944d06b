//! Atlas supplement pages.
//!
//! The atlas books lay equipment out as tables under category headers
//! rather than in the rulebook's flowing layout, so pages are itemized and
//! read field by field instead of going through a grammar. Unlike grammar
//! failures, a malformed row is a hard error for the whole page.

pub mod itemizer;
pub mod parsers;

use crate::model::{Accessory, Armor, ItemCategory, Shield, Weapon, WeaponModule};
use crate::token::{fonts, Token};
use itemizer::{itemize, ItemTokens};
use parsers::Fields;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    #[error("Page is not watermarked")]
    NotWatermarked,
    #[error("Undefined {field} for {category} item \"{item}\"")]
    UndefinedField {
        category: ItemCategory,
        item: String,
        field: &'static str,
    },
}

/// The items listed under one category header.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasItems {
    Weapons(Vec<Weapon>),
    Armors(Vec<Armor>),
    Shields(Vec<Shield>),
    Accessories(Vec<Accessory>),
    WeaponModules(Vec<WeaponModule>),
}

impl AtlasItems {
    pub fn category(&self) -> ItemCategory {
        match self {
            AtlasItems::Weapons(_) => ItemCategory::Weapon,
            AtlasItems::Armors(_) => ItemCategory::Armor,
            AtlasItems::Shields(_) => ItemCategory::Shield,
            AtlasItems::Accessories(_) => ItemCategory::Accessory,
            AtlasItems::WeaponModules(_) => ItemCategory::WeaponModule,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AtlasItems::Weapons(items) => items.len(),
            AtlasItems::Armors(items) => items.len(),
            AtlasItems::Shields(items) => items.len(),
            AtlasItems::Accessories(items) => items.len(),
            AtlasItems::WeaponModules(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_all<T>(
    category: ItemCategory,
    items: &[ItemTokens],
    parse: impl Fn(&Fields) -> Result<T, AtlasError>,
) -> Result<Vec<T>, AtlasError> {
    items
        .iter()
        .map(|item| parse(&Fields::new(category, item)))
        .collect()
}

/// Reads every category table on a page, in header order.
pub fn parse_atlas_page(tokens: &[Token]) -> Result<Vec<AtlasItems>, AtlasError> {
    let watermarked = tokens
        .last()
        .and_then(Token::as_text)
        .is_some_and(|t| t.font == fonts::WATERMARK);
    if !watermarked {
        return Err(AtlasError::NotWatermarked);
    }

    itemize(tokens)
        .into_iter()
        .map(|(category, items)| {
            Ok(match category {
                ItemCategory::Weapon => {
                    AtlasItems::Weapons(parse_all(category, &items, parsers::parse_weapon)?)
                }
                ItemCategory::Armor => {
                    AtlasItems::Armors(parse_all(category, &items, parsers::parse_armor)?)
                }
                ItemCategory::Shield => {
                    AtlasItems::Shields(parse_all(category, &items, parsers::parse_shield)?)
                }
                ItemCategory::Accessory => AtlasItems::Accessories(parse_all(
                    category,
                    &items,
                    parsers::parse_accessory,
                )?),
                ItemCategory::WeaponModule => AtlasItems::WeaponModules(parse_all(
                    category,
                    &items,
                    parsers::parse_weapon_module,
                )?),
            })
        })
        .collect()
}
