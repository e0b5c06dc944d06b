//! Field extraction for itemized atlas rows.
//!
//! Rows are read by position. Optional glyphs (the martial mark, an
//! accuracy bonus) shift every later field by one.

use super::itemizer::ItemTokens;
use super::AtlasError;
use crate::analyzer::parsers::armor::convert_defense;
use crate::analyzer::parsers::{convert_cost, convert_dash_or_number, prettify};
use crate::model::{
    Accessory, Accuracy, Armor, DamageType, Distance, Handed, ItemCategory, ModuleType, Shield,
    Stat, Weapon, WeaponCategory, WeaponModule,
};
use crate::token::{fonts, ImageToken};

const NO_QUALITIES: &str = "No qualities.";
const SHIELD_MODULE: &str = "Shield module";

/// Positional access to one row, reporting missing fields against it.
pub struct Fields<'a> {
    category: ItemCategory,
    item: &'a ItemTokens,
}

impl<'a> Fields<'a> {
    pub fn new(category: ItemCategory, item: &'a ItemTokens) -> Self {
        Self { category, item }
    }

    fn undefined(&self, field: &'static str) -> AtlasError {
        AtlasError::UndefinedField {
            category: self.category,
            item: self.item.text(0).unwrap_or_default().to_string(),
            field,
        }
    }

    fn text(&self, index: usize, field: &'static str) -> Result<&'a str, AtlasError> {
        self.item.text(index).ok_or_else(|| self.undefined(field))
    }

    fn coerce<T>(
        &self,
        index: usize,
        field: &'static str,
        f: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, AtlasError> {
        f(self.text(index, field)?).ok_or_else(|| self.undefined(field))
    }

    fn image(&self) -> Result<ImageToken, AtlasError> {
        self.item.image.clone().ok_or_else(|| self.undefined("image"))
    }

    fn is_martial(&self) -> bool {
        self.item
            .strings
            .get(1)
            .is_some_and(|t| t.font.contains(fonts::BASIC_SHAPES) && t.text == "E")
    }

    /// An accuracy bonus is present when the slot after the accuracy
    /// bracket holds a number.
    fn bonus(&self, index: usize) -> Option<i64> {
        self.item.text(index)?.trim().parse().ok()
    }

    fn description(&self, from: usize) -> String {
        let lines: Vec<&str> = self
            .item
            .strings
            .iter()
            .skip(from)
            .map(|t| t.text.as_str())
            .collect();
        prettify(&lines)
    }

    /// Module descriptions are printed between separators and may carry a
    /// placeholder line.
    fn module_description(&self, from: usize) -> String {
        let lines: Vec<&str> = self
            .item
            .strings
            .iter()
            .skip(from)
            .filter(|t| !t.font.contains(fonts::SEPARATOR) && t.text != NO_QUALITIES)
            .map(|t| t.text.as_str())
            .collect();
        prettify(&lines)
    }
}

fn split_accuracy(s: &str) -> Option<(Stat, Stat)> {
    let (primary, secondary) = s.split_once('+')?;
    Some((primary.trim().parse().ok()?, secondary.trim().parse().ok()?))
}

fn convert_damage(s: &str) -> Option<i64> {
    s.strip_prefix("HR +")?.trim().parse().ok()
}

fn lowercase<T: std::str::FromStr>(s: &str) -> Option<T> {
    s.to_lowercase().parse().ok()
}

pub fn parse_weapon(fields: &Fields) -> Result<Weapon, AtlasError> {
    let martial = fields.is_martial();
    let mut shift = usize::from(martial);

    let name = fields.text(0, "name")?.to_string();
    let cost = fields.coerce(1 + shift, "cost", convert_cost)?;
    let (primary, secondary) = fields.coerce(3 + shift, "accuracy", split_accuracy)?;
    let bonus = fields.bonus(5 + shift);
    if bonus.is_some() {
        shift += 1;
    }
    let damage = fields.coerce(6 + shift, "damage", convert_damage)?;
    let damage_type = fields.coerce(8 + shift, "damageType", |s| s.parse::<DamageType>().ok())?;
    let category = fields.coerce(9 + shift, "category", lowercase::<WeaponCategory>)?;
    let hands = fields.coerce(11 + shift, "hands", lowercase::<Handed>)?;
    let melee = fields.coerce(13 + shift, "distance", lowercase::<Distance>)?;

    Ok(Weapon {
        image: fields.image()?,
        name,
        martial,
        cost,
        accuracy: Accuracy {
            primary,
            secondary,
            bonus: bonus.unwrap_or_default(),
        },
        damage,
        damage_type,
        hands,
        melee,
        category,
        description: fields.description(15 + shift),
    })
}

pub fn parse_armor(fields: &Fields) -> Result<Armor, AtlasError> {
    let martial = fields.is_martial();
    let shift = usize::from(martial);
    Ok(Armor {
        image: fields.image()?,
        name: fields.text(0, "name")?.to_string(),
        martial,
        cost: fields.coerce(1 + shift, "cost", convert_cost)?,
        def: fields.coerce(2 + shift, "def", |s| convert_defense("DEX", s))?,
        mdef: fields.coerce(3 + shift, "mdef", |s| convert_defense("INS", s))?,
        init: fields.coerce(4 + shift, "init", convert_dash_or_number)?,
        description: fields.description(5 + shift),
    })
}

pub fn parse_shield(fields: &Fields) -> Result<Shield, AtlasError> {
    let martial = fields.is_martial();
    let shift = usize::from(martial);
    Ok(Shield {
        image: fields.image()?,
        name: fields.text(0, "name")?.to_string(),
        martial,
        cost: fields.coerce(1 + shift, "cost", convert_cost)?,
        def: fields.coerce(2 + shift, "def", convert_dash_or_number)?,
        mdef: fields.coerce(3 + shift, "mdef", convert_dash_or_number)?,
        init: fields.coerce(4 + shift, "init", convert_dash_or_number)?,
        description: fields.description(5 + shift),
    })
}

pub fn parse_accessory(fields: &Fields) -> Result<Accessory, AtlasError> {
    Ok(Accessory {
        image: fields.image()?,
        name: fields.text(0, "name")?.to_string(),
        cost: fields.coerce(1, "cost", convert_cost)?,
        description: fields.description(2),
    })
}

fn is_shield_module(item: &ItemTokens) -> bool {
    item.strings
        .iter()
        .any(|t| t.font.contains(fonts::BODY_BOLD) && t.text.contains(SHIELD_MODULE))
}

/// Shield modules print no attack profile; they get a fixed one.
fn parse_shield_module(fields: &Fields) -> Result<WeaponModule, AtlasError> {
    Ok(WeaponModule {
        image: fields.image()?,
        name: fields.text(0, "name")?.to_string(),
        cost: fields.coerce(1, "cost", convert_cost)?,
        accuracy: Accuracy {
            primary: Stat::Dex,
            secondary: Stat::Ins,
            bonus: 0,
        },
        damage: 0,
        damage_type: DamageType::Physical,
        module_type: ModuleType::Shield,
        category: WeaponCategory::Arcane,
        description: fields.module_description(4),
        is_complex: false,
    })
}

pub fn parse_weapon_module(fields: &Fields) -> Result<WeaponModule, AtlasError> {
    if is_shield_module(fields.item) {
        return parse_shield_module(fields);
    }

    let name = fields.text(0, "name")?.to_string();
    let cost = fields.coerce(1, "cost", convert_cost)?;
    let (primary, secondary) = fields.coerce(3, "accuracy", split_accuracy)?;
    let bonus = fields.bonus(5);
    let shift = usize::from(bonus.is_some());
    let damage = fields.coerce(6 + shift, "damage", convert_damage)?;
    let damage_type = fields.coerce(8 + shift, "damageType", |s| s.parse::<DamageType>().ok())?;
    let category = fields.coerce(9 + shift, "category", lowercase::<WeaponCategory>)?;
    let distance = fields.coerce(11 + shift, "distance", lowercase::<Distance>)?;

    Ok(WeaponModule {
        image: fields.image()?,
        name,
        cost,
        accuracy: Accuracy {
            primary,
            secondary,
            bonus: bonus.unwrap_or_default(),
        },
        damage,
        damage_type,
        module_type: ModuleType::from(distance),
        category,
        description: fields.module_description(13 + shift),
        is_complex: false,
    })
}
