//! Beast actors.
//!
//! A beast becomes an `npc` actor plus the items embedded in it: one
//! `basic` item per attack, `spell`, `miscAbility` and `rule` items for the
//! remaining sections, and the equipment it carries, looked up by name
//! among the items already imported.

use super::item::{
    BasicSystem, Equipped, ItemData, ItemPayload, MiscAbilitySystem, RollInfo, RuleSystem, Slot,
    SpellSystem,
};
use super::{field, AttributePair, Field, Placement};
use crate::model::{Beast, DamageType, Handed};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub img: String,
    pub prototype_token: PrototypeToken,
    pub folder: String,
    pub system: NpcSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeToken {
    pub texture: Texture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcSystem {
    pub description: String,
    pub level: Field<i64>,
    pub resources: Resources,
    pub affinities: BTreeMap<DamageType, Modified>,
    pub attributes: Attributes,
    pub derived: Derived,
    pub traits: Field<String>,
    pub species: Field<String>,
    pub use_equipment: Field<bool>,
    pub source: Field<String>,
    pub villain: Field<String>,
    pub is_elite: Field<bool>,
    pub is_champion: Field<i64>,
    pub is_companion: Field<bool>,
    pub study: Field<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub value: i64,
    pub max: i64,
    pub min: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub hp: Resource,
    pub mp: Resource,
    pub ip: Resource,
    pub fp: Field<i64>,
}

/// A base value, its current value and the bonus applied on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modified {
    pub base: i64,
    pub current: i64,
    pub bonus: i64,
}

impl Modified {
    fn fixed(value: i64) -> Self {
        Self {
            base: value,
            current: value,
            bonus: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub dex: Modified,
    pub ins: Modified,
    pub mig: Modified,
    pub wlp: Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub value: i64,
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub init: Bonus,
    pub def: Bonus,
    pub mdef: Bonus,
    pub accuracy: Bonus,
    pub magic: Bonus,
}

/// Everything created for one beast.
#[derive(Debug, Clone, PartialEq)]
pub struct BeastActor {
    pub actor: ActorPayload,
    /// Attacks, spells, other actions and special rules.
    pub abilities: Vec<ItemPayload>,
    /// Equipment copies with their slots assigned.
    pub equipment: Vec<ItemPayload>,
}

impl BeastActor {
    /// Embedded items in creation order.
    pub fn embedded_items(&self) -> impl Iterator<Item = &ItemPayload> {
        self.abilities.iter().chain(self.equipment.iter())
    }
}

/// Maps `beast` to its actor. `equipment` holds the imported items found
/// for the beast's equipment list, in list order.
pub fn beast_actor(
    beast: &Beast,
    equipment: Vec<ItemPayload>,
    placement: &Placement,
) -> BeastActor {
    let equipment = equip(equipment);
    let attributes = &beast.attributes;
    let (dex, ins, mig, wlp) = (
        attributes.dex.value(),
        attributes.ins.value(),
        attributes.mig.value(),
        attributes.wlp.value(),
    );
    let max_hp = 2 * beast.level + 5 * mig;
    let max_mp = beast.level + 5 * wlp;
    let unequipped = |value: i64| if beast.equipment.is_none() { value } else { 0 };
    let img = placement.image_for(&beast.image, &beast.name);

    let system = NpcSystem {
        description: beast.description.clone(),
        level: field(beast.level),
        resources: Resources {
            hp: Resource {
                value: attributes.max_hp,
                max: max_hp,
                min: 0,
                bonus: Some(attributes.max_hp - max_hp),
            },
            mp: Resource {
                value: attributes.max_mp,
                max: max_mp,
                min: 0,
                bonus: Some(attributes.max_mp - max_mp),
            },
            ip: Resource {
                value: 6,
                max: 6,
                min: 0,
                bonus: None,
            },
            fp: field(3),
        },
        affinities: beast
            .resists
            .iter()
            .map(|(damage_type, affinity)| (damage_type, Modified::fixed(affinity.level())))
            .collect(),
        attributes: Attributes {
            dex: Modified::fixed(dex),
            ins: Modified::fixed(ins),
            mig: Modified::fixed(mig),
            wlp: Modified::fixed(wlp),
        },
        derived: Derived {
            init: Bonus {
                value: attributes.init,
                bonus: init_bonus(beast, &equipment),
            },
            def: Bonus {
                value: 0,
                bonus: unequipped(attributes.def),
            },
            mdef: Bonus {
                value: 0,
                bonus: unequipped(attributes.mdef),
            },
            accuracy: Bonus { value: 0, bonus: 0 },
            magic: Bonus { value: 0, bonus: 0 },
        },
        traits: field(beast.traits.clone()),
        species: field(beast.beast_type.to_lowercase()),
        use_equipment: field(beast.equipment.is_some()),
        source: field(placement.source.to_string()),
        villain: field(String::new()),
        is_elite: field(false),
        is_champion: field(1),
        is_companion: field(false),
        study: field(0),
    };

    BeastActor {
        actor: ActorPayload {
            kind: "npc".to_string(),
            name: beast.name.clone(),
            img: img.clone(),
            prototype_token: PrototypeToken {
                texture: Texture { src: img },
            },
            folder: placement.folder_id.to_string(),
            system,
        },
        abilities: abilities(beast),
        equipment,
    }
}

fn ability(name: &str, data: ItemData) -> ItemPayload {
    ItemPayload {
        name: name.to_string(),
        img: None,
        folder: None,
        data,
    }
}

fn abilities(beast: &Beast) -> Vec<ItemPayload> {
    let attacks = beast.attacks.iter().map(|attack| {
        ability(
            &attack.name,
            ItemData::Basic(BasicSystem {
                attributes: AttributePair::new(attack.accuracy.primary, attack.accuracy.secondary),
                accuracy: field(attack.accuracy.bonus),
                damage: field(attack.damage),
                distance: field(attack.range),
                damage_type: field(attack.damage_type),
                description: attack.description.clone(),
                is_behavior: false,
                weight: field(1),
                quality: field(String::new()),
            }),
        )
    });
    let spells = beast.spells.iter().map(|spell| {
        ability(
            &spell.name,
            ItemData::Spell(SpellSystem {
                mp_cost: field(spell.mp.clone()),
                target: field(spell.target.clone()),
                duration: field(spell.duration.clone()),
                is_offensive: field(spell.accuracy.is_some()),
                has_roll: field(spell.accuracy.is_some()),
                roll_info: spell.accuracy.map(|accuracy| RollInfo {
                    attributes: AttributePair::new(accuracy.primary, accuracy.secondary),
                    accuracy: field(accuracy.bonus),
                }),
                description: spell.description.clone(),
                is_behavior: false,
                weight: field(1),
                quality: field(spell.opportunity.clone().unwrap_or_default()),
            }),
        )
    });
    let other_actions = beast.other_actions.iter().map(|action| {
        ability(
            &action.name,
            ItemData::MiscAbility(MiscAbilitySystem {
                description: action.description.clone(),
                is_behavior: false,
                weight: field(1),
                has_clock: field(false),
                has_roll: field(false),
            }),
        )
    });
    let special_rules = beast.special_rules.iter().map(|rule| {
        ability(
            &rule.name,
            ItemData::Rule(RuleSystem {
                description: rule.description.clone(),
                is_behavior: false,
                weight: field(1),
                has_clock: field(false),
            }),
        )
    });
    attacks
        .chain(spells)
        .chain(other_actions)
        .chain(special_rules)
        .collect()
}

/// Assigns equipment slots in list order.
///
/// The first weapon takes the main hand, and a two-handed one takes the off
/// hand as well. A later one-handed weapon or a shield takes the off hand
/// while it is free. Armor and accessories always go to their own slot.
/// Items that fit nowhere are carried unequipped.
pub fn equip(mut items: Vec<ItemPayload>) -> Vec<ItemPayload> {
    let mut main_hand_free = true;
    let mut off_hand_free = true;
    for item in items.iter_mut() {
        let slot = match &item.data {
            ItemData::Weapon(weapon) if main_hand_free => {
                main_hand_free = false;
                if weapon.hands.value == Handed::TwoHanded {
                    off_hand_free = false;
                }
                Some(Slot::MainHand)
            }
            ItemData::Weapon(weapon)
                if off_hand_free && weapon.hands.value == Handed::OneHanded =>
            {
                off_hand_free = false;
                Some(Slot::OffHand)
            }
            ItemData::Shield(_) if off_hand_free => {
                off_hand_free = false;
                Some(Slot::OffHand)
            }
            ItemData::Armor(_) => Some(Slot::Armor),
            ItemData::Accessory(_) => Some(Slot::Accessory),
            _ => None,
        };
        if let Some(slot) = slot {
            item.set_equipped(Equipped { slot, value: true });
        }
    }
    items
}

/// The printed initiative minus what equipped armor, shields and
/// accessories contribute and the DEX/INS average.
pub fn init_bonus(beast: &Beast, equipment: &[ItemPayload]) -> i64 {
    let equipped_init: i64 = equipment
        .iter()
        .filter_map(|item| match &item.data {
            ItemData::Armor(system) | ItemData::Shield(system) | ItemData::Accessory(system)
                if system.is_equipped.is_some() =>
            {
                Some(system.init.value)
            }
            _ => None,
        })
        .sum();
    let attributes = &beast.attributes;
    attributes.init - equipped_init - (attributes.dex.value() + attributes.ins.value()) / 2
}
