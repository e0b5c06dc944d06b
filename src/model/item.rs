use super::{Accuracy, DamageType, Distance, Handed, ModuleType, WeaponCategory};
use crate::token::ImageToken;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weapon {
    pub image: ImageToken,
    pub name: String,
    pub martial: bool,
    pub cost: i64,
    pub accuracy: Accuracy,
    pub damage: i64,
    pub damage_type: DamageType,
    pub hands: Handed,
    pub melee: Distance,
    pub category: WeaponCategory,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Armor {
    pub image: ImageToken,
    pub name: String,
    pub martial: bool,
    pub cost: i64,
    pub def: i64,
    pub mdef: i64,
    pub init: i64,
    pub description: String,
}

/// Shields share the armor layout; only their page grammar differs.
pub type Shield = Armor;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accessory {
    pub image: ImageToken,
    pub name: String,
    pub cost: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consumable {
    pub image: ImageToken,
    pub name: String,
    pub ip_cost: i64,
    pub description: String,
}

/// Consumables listed under one subcategory header, e.g. "Potions".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumableGroup {
    pub category: String,
    pub items: Vec<Consumable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponModule {
    pub image: ImageToken,
    pub name: String,
    pub cost: i64,
    pub accuracy: Accuracy,
    pub damage: i64,
    pub damage_type: DamageType,
    pub module_type: ModuleType,
    pub category: WeaponCategory,
    pub description: String,
    pub is_complex: bool,
}
