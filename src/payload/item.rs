//! Item payloads.

use super::{field, AttributePair, Field, Placement};
use crate::model::{
    Accessory, Armor, Consumable, DamageType, Distance, Handed, ModuleType, Shield, Stat, Weapon,
    WeaponCategory, WeaponModule,
};
use serde::{Deserialize, Serialize};

/// Placeholder the rulebook prints for weapons and armor without qualities.
const NO_QUALITY: &str = "No Quality.";
const WEAPON_MODULE_FEATURE: &str = "projectfu.weaponModule";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(flatten)]
    pub data: ItemData,
}

impl ItemPayload {
    /// The platform's type tag, e.g. `weapon` or `classFeature`.
    pub fn kind(&self) -> &'static str {
        match &self.data {
            ItemData::Weapon(_) => "weapon",
            ItemData::Armor(_) => "armor",
            ItemData::Shield(_) => "shield",
            ItemData::Accessory(_) => "accessory",
            ItemData::Consumable(_) => "consumable",
            ItemData::ClassFeature(_) => "classFeature",
            ItemData::Basic(_) => "basic",
            ItemData::Spell(_) => "spell",
            ItemData::MiscAbility(_) => "miscAbility",
            ItemData::Rule(_) => "rule",
        }
    }

    /// Marks a weapon, armor, shield or accessory as equipped. Other item
    /// types have no slot and are left untouched.
    pub fn set_equipped(&mut self, equipped: Equipped) {
        match &mut self.data {
            ItemData::Weapon(system) => system.is_equipped = Some(equipped),
            ItemData::Armor(system) | ItemData::Shield(system) | ItemData::Accessory(system) => {
                system.is_equipped = Some(equipped)
            }
            _ => {}
        }
    }

    pub fn equipped(&self) -> Option<Equipped> {
        match &self.data {
            ItemData::Weapon(system) => system.is_equipped,
            ItemData::Armor(system) | ItemData::Shield(system) | ItemData::Accessory(system) => {
                system.is_equipped
            }
            _ => None,
        }
    }
}

/// Item type tag and its `system` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "system", rename_all = "camelCase")]
pub enum ItemData {
    Weapon(WeaponSystem),
    Armor(ArmorSystem),
    Shield(ArmorSystem),
    Accessory(ArmorSystem),
    Consumable(ConsumableSystem),
    ClassFeature(ClassFeatureSystem),
    Basic(BasicSystem),
    Spell(SpellSystem),
    MiscAbility(MiscAbilitySystem),
    Rule(RuleSystem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    MainHand,
    OffHand,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipped {
    pub slot: Slot,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponSystem {
    pub is_martial: Field<bool>,
    pub description: String,
    pub cost: Field<i64>,
    pub attributes: AttributePair,
    pub accuracy: Field<i64>,
    pub damage: Field<i64>,
    #[serde(rename = "type")]
    pub distance: Field<Distance>,
    pub category: Field<WeaponCategory>,
    pub hands: Field<Handed>,
    pub damage_type: Field<DamageType>,
    pub source: Field<String>,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    pub is_custom_weapon: Field<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_equipped: Option<Equipped>,
}

/// Shared by armor, shields and accessories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorSystem {
    pub is_martial: Field<bool>,
    pub description: String,
    pub cost: Field<i64>,
    pub source: Field<String>,
    pub def: Field<i64>,
    pub mdef: Field<i64>,
    pub init: Field<i64>,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_equipped: Option<Equipped>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableSystem {
    pub ip_cost: Field<i64>,
    pub description: String,
    pub source: Field<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeatureSystem {
    pub feature_type: String,
    pub source: String,
    pub data: WeaponModuleData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponModuleData {
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub description: String,
    pub accuracy: ModuleAccuracy,
    pub damage: ModuleDamage,
    pub category: WeaponCategory,
    pub shield: ModuleShield,
    pub complex: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleAccuracy {
    pub attr1: Stat,
    pub attr2: Stat,
    pub modifier: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDamage {
    #[serde(rename = "type")]
    pub damage_type: DamageType,
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleShield {
    pub defense: i64,
    pub magic_defense: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSystem {
    pub attributes: AttributePair,
    pub accuracy: Field<i64>,
    pub damage: Field<i64>,
    #[serde(rename = "type")]
    pub distance: Field<Distance>,
    pub damage_type: Field<Option<DamageType>>,
    pub description: String,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    pub quality: Field<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollInfo {
    pub attributes: AttributePair,
    pub accuracy: Field<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSystem {
    pub mp_cost: Field<String>,
    pub target: Field<String>,
    pub duration: Field<String>,
    pub is_offensive: Field<bool>,
    pub has_roll: Field<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_info: Option<RollInfo>,
    pub description: String,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    pub quality: Field<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiscAbilitySystem {
    pub description: String,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    pub has_clock: Field<bool>,
    pub has_roll: Field<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSystem {
    pub description: String,
    pub is_behavior: bool,
    pub weight: Field<i64>,
    pub has_clock: Field<bool>,
}

fn quality(description: &str) -> String {
    if description == NO_QUALITY {
        String::new()
    } else {
        description.to_string()
    }
}

fn placed(name: &str, img: String, placement: &Placement, data: ItemData) -> ItemPayload {
    ItemPayload {
        name: name.to_string(),
        img: Some(img),
        folder: Some(placement.folder_id.to_string()),
        data,
    }
}

pub fn weapon_payload(weapon: &Weapon, placement: &Placement) -> ItemPayload {
    let system = WeaponSystem {
        is_martial: field(weapon.martial),
        description: quality(&weapon.description),
        cost: field(weapon.cost),
        attributes: AttributePair::new(weapon.accuracy.primary, weapon.accuracy.secondary),
        accuracy: field(weapon.accuracy.bonus),
        damage: field(weapon.damage),
        distance: field(weapon.melee),
        category: field(weapon.category),
        hands: field(weapon.hands),
        damage_type: field(weapon.damage_type),
        source: field(placement.source.to_string()),
        is_behavior: false,
        weight: field(1),
        is_custom_weapon: field(false),
        is_equipped: None,
    };
    placed(
        &weapon.name,
        placement.image_for(&weapon.image, &weapon.name),
        placement,
        ItemData::Weapon(system),
    )
}

fn armor_system(armor: &Armor, placement: &Placement) -> ArmorSystem {
    ArmorSystem {
        is_martial: field(armor.martial),
        description: quality(&armor.description),
        cost: field(armor.cost),
        source: field(placement.source.to_string()),
        def: field(armor.def),
        mdef: field(armor.mdef),
        init: field(armor.init),
        is_behavior: false,
        weight: field(1),
        is_equipped: None,
    }
}

pub fn armor_payload(armor: &Armor, placement: &Placement) -> ItemPayload {
    placed(
        &armor.name,
        placement.image_for(&armor.image, &armor.name),
        placement,
        ItemData::Armor(armor_system(armor, placement)),
    )
}

pub fn shield_payload(shield: &Shield, placement: &Placement) -> ItemPayload {
    placed(
        &shield.name,
        placement.image_for(&shield.image, &shield.name),
        placement,
        ItemData::Shield(armor_system(shield, placement)),
    )
}

pub fn accessory_payload(accessory: &Accessory, placement: &Placement) -> ItemPayload {
    let system = ArmorSystem {
        is_martial: field(false),
        description: accessory.description.clone(),
        cost: field(accessory.cost),
        source: field(placement.source.to_string()),
        def: field(0),
        mdef: field(0),
        init: field(0),
        is_behavior: false,
        weight: field(1),
        is_equipped: None,
    };
    placed(
        &accessory.name,
        placement.image_for(&accessory.image, &accessory.name),
        placement,
        ItemData::Accessory(system),
    )
}

pub fn consumable_payload(consumable: &Consumable, placement: &Placement) -> ItemPayload {
    let system = ConsumableSystem {
        ip_cost: field(consumable.ip_cost),
        description: consumable.description.clone(),
        source: field(placement.source.to_string()),
    };
    placed(
        &consumable.name,
        placement.image_for(&consumable.image, &consumable.name),
        placement,
        ItemData::Consumable(system),
    )
}

/// Weapon modules are class features of the platform.
pub fn weapon_module_payload(module: &WeaponModule, placement: &Placement) -> ItemPayload {
    let system = ClassFeatureSystem {
        feature_type: WEAPON_MODULE_FEATURE.to_string(),
        source: placement.source.to_string(),
        data: WeaponModuleData {
            module_type: module.module_type,
            description: module.description.clone(),
            accuracy: ModuleAccuracy {
                attr1: module.accuracy.primary,
                attr2: module.accuracy.secondary,
                modifier: module.accuracy.bonus,
            },
            damage: ModuleDamage {
                damage_type: module.damage_type,
                bonus: module.damage,
            },
            category: module.category,
            shield: ModuleShield {
                defense: 2,
                magic_defense: 2,
            },
            complex: module.is_complex,
        },
    };
    placed(
        &module.name,
        placement.image_for(&module.image, &module.name),
        placement,
        ItemData::ClassFeature(system),
    )
}
