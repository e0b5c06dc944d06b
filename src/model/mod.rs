//! Domain records parsed from rulebook pages and the closed vocabularies
//! they draw from.

pub mod beast;
pub mod item;

pub use beast::*;
pub use item::*;

use serde::{Deserialize, Serialize, Serializer};
use strum::EnumCount;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Dex,
    Mig,
    Ins,
    Wlp,
}

/// Damage types in rulebook order. The order drives the resistance block of
/// a bestiary entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Physical = 0,
    Air = 1,
    Bolt = 2,
    Dark = 3,
    Earth = 4,
    Fire = 5,
    Ice = 6,
    Light = 7,
    Poison = 8,
}

impl DamageType {
    /// Glyph printed for the type in a bestiary resistance block. Air and
    /// dark share `a`, bolt and poison share `b`.
    pub fn code(self) -> &'static str {
        match self {
            DamageType::Physical => "'",
            DamageType::Air => "a",
            DamageType::Bolt => "b",
            DamageType::Dark => "a",
            DamageType::Earth => "E",
            DamageType::Fire => "f",
            DamageType::Ice => "i",
            DamageType::Light => "l",
            DamageType::Poison => "b",
        }
    }
}

/// Affinity scale, weakest to strongest.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Affinity {
    #[strum(serialize = "VU")]
    #[serde(rename = "VU")]
    Vulnerable,
    #[default]
    #[strum(serialize = "N")]
    #[serde(rename = "N")]
    Normal,
    #[strum(serialize = "RS")]
    #[serde(rename = "RS")]
    Resistant,
    #[strum(serialize = "IM")]
    #[serde(rename = "IM")]
    Immune,
    #[strum(serialize = "AB")]
    #[serde(rename = "AB")]
    Absorb,
}

impl Affinity {
    /// Numeric level stored by the platform.
    pub fn level(self) -> i64 {
        match self {
            Affinity::Vulnerable => -1,
            Affinity::Normal => 0,
            Affinity::Resistant => 1,
            Affinity::Immune => 2,
            Affinity::Absorb => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum DieSize {
    D6,
    D8,
    D10,
    D12,
}

impl DieSize {
    pub fn value(self) -> i64 {
        match self {
            DieSize::D6 => 6,
            DieSize::D8 => 8,
            DieSize::D10 => 10,
            DieSize::D12 => 12,
        }
    }
}

impl TryFrom<i64> for DieSize {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(DieSize::D6),
            8 => Ok(DieSize::D8),
            10 => Ok(DieSize::D10),
            12 => Ok(DieSize::D12),
            other => Err(format!("Unexpected die size {other}")),
        }
    }
}

impl Serialize for DieSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Handed {
    OneHanded,
    TwoHanded,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Melee,
    Ranged,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Arcane,
    Bow,
    Brawling,
    Dagger,
    Firearm,
    Flail,
    Heavy,
    Spear,
    Sword,
    Thrown,
}

impl WeaponCategory {
    /// Validates a category word taken from a page title.
    pub fn from_title(word: &str) -> Result<Self, String> {
        let lowered = word.to_lowercase();
        lowered
            .parse()
            .map_err(|_| format!("Unexpected category {lowered}"))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Melee,
    Ranged,
    Shield,
}

impl From<Distance> for ModuleType {
    fn from(distance: Distance) -> Self {
        match distance {
            Distance::Melee => ModuleType::Melee,
            Distance::Ranged => ModuleType::Ranged,
        }
    }
}

/// Category headers of the atlas equipment pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
pub enum ItemCategory {
    #[strum(serialize = "WEAPON")]
    Weapon,
    #[strum(serialize = "ARMOR")]
    Armor,
    #[strum(serialize = "SHIELD")]
    Shield,
    #[strum(serialize = "ACCESSORY")]
    Accessory,
    #[strum(serialize = "WEAPON MODULE")]
    WeaponModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accuracy {
    pub primary: Stat,
    pub secondary: Stat,
    pub bonus: i64,
}
