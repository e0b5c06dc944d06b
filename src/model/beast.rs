use super::{Accuracy, Affinity, DamageType, DieSize, Distance};
use crate::token::ImageToken;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use strum::{EnumCount, IntoEnumIterator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beast {
    pub image: ImageToken,
    pub name: String,
    pub level: i64,
    #[serde(rename = "type")]
    pub beast_type: String,
    pub description: String,
    pub traits: String,
    pub attributes: BeastAttributes,
    pub resists: ResistanceMap,
    pub equipment: Option<Vec<String>>,
    pub attacks: Vec<BeastAttack>,
    pub spells: Vec<BeastSpell>,
    pub other_actions: Vec<BeastRule>,
    pub special_rules: Vec<BeastRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeastAttributes {
    pub dex: DieSize,
    pub ins: DieSize,
    pub mig: DieSize,
    pub wlp: DieSize,
    pub max_hp: i64,
    pub crisis: i64,
    pub max_mp: i64,
    pub init: i64,
    pub def: i64,
    pub mdef: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeastAttack {
    pub range: Distance,
    pub name: String,
    pub accuracy: Accuracy,
    pub damage: i64,
    pub damage_type: Option<DamageType>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeastSpell {
    pub name: String,
    pub accuracy: Option<Accuracy>,
    pub mp: String,
    pub target: String,
    pub duration: String,
    pub description: String,
    pub opportunity: Option<String>,
}

/// A named rule text: an other action or a special rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeastRule {
    pub name: String,
    pub description: String,
}

/// One affinity per damage type. Unmarked types hold [`Affinity::Normal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResistanceMap([Affinity; DamageType::COUNT]);

impl ResistanceMap {
    pub fn get(&self, damage_type: DamageType) -> Affinity {
        self.0[damage_type as usize]
    }

    pub fn set(&mut self, damage_type: DamageType, affinity: Affinity) {
        self.0[damage_type as usize] = affinity;
    }

    pub fn with(mut self, damage_type: DamageType, affinity: Affinity) -> Self {
        self.set(damage_type, affinity);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, Affinity)> + '_ {
        DamageType::iter().map(|t| (t, self.get(t)))
    }
}

impl Serialize for ResistanceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DamageType::COUNT))?;
        for (damage_type, affinity) in self.iter() {
            map.serialize_entry(&damage_type, &affinity)?;
        }
        map.end()
    }
}
