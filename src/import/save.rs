//! Writes parsed records to the platform.
//!
//! Every record is saved independently: a failed upload or create is
//! recorded in the [`SaveReport`] and the remaining records still go out.
//! Weapons and weapon modules are only created once their image uploaded.

use super::{PageSuccess, Records};
use crate::model::{Accessory, Armor, Beast, Consumable, ConsumableGroup, Weapon, WeaponModule};
use crate::payload::{
    accessory_payload, armor_payload, beast_actor, consumable_payload, shield_payload,
    weapon_module_payload, weapon_payload, ItemPayload, Placement,
};
use crate::platform::{FolderKind, Platform, PlatformError};
use crate::token::ImageToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Names of the created items and actors.
    pub created: Vec<String>,
    pub failures: Vec<SaveFailure>,
    /// Beast equipment with no matching item.
    pub missing_equipment: Vec<String>,
}

impl SaveReport {
    fn fail(&mut self, name: &str, error: &PlatformError) {
        warn!(target: "save", name, error = ?error, "save failed");
        self.failures.push(SaveFailure {
            name: name.to_string(),
            error: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.missing_equipment.is_empty()
    }
}

/// A record that is saved with an image.
trait Pictured {
    fn name(&self) -> &str;
    fn image(&self) -> &ImageToken;
}

macro_rules! pictured {
    ($($t:ty),*) => {
        $(impl Pictured for $t {
            fn name(&self) -> &str {
                &self.name
            }

            fn image(&self) -> &ImageToken {
                &self.image
            }
        })*
    };
}

pictured!(Weapon, Armor, Accessory, Consumable, WeaponModule, Beast);

struct Saver<'a> {
    platform: &'a dyn Platform,
    source: &'a str,
    image_path: &'a str,
    report: SaveReport,
}

impl Saver<'_> {
    async fn folder(&mut self, path: &[String], kind: FolderKind) -> Option<String> {
        match self.platform.find_or_create_folder(path, kind).await {
            Ok(id) => Some(id),
            Err(e) => {
                self.report.fail(&path.join("/"), &e);
                None
            }
        }
    }

    async fn upload(&self, record: &impl Pictured) -> Result<String, PlatformError> {
        let image = record.image();
        self.platform
            .upload_image(
                &image.data.bytes,
                &image.file_name(record.name()),
                self.image_path,
            )
            .await
    }

    async fn items<T: Pictured>(
        &mut self,
        path: &[String],
        records: &[T],
        to_payload: fn(&T, &Placement) -> ItemPayload,
        image_required: bool,
    ) {
        let Some(folder_id) = self.folder(path, FolderKind::Item).await else {
            return;
        };
        for record in records {
            if let Err(e) = self.upload(record).await {
                if image_required {
                    self.report.fail(record.name(), &e);
                    continue;
                }
                warn!(target: "save", name = record.name(), error = ?e, "image not uploaded");
            }
            let placement = Placement {
                image_path: self.image_path,
                folder_id: &folder_id,
                source: self.source,
            };
            match self.platform.create_item(&to_payload(record, &placement)).await {
                Ok(_) => self.report.created.push(record.name().to_string()),
                Err(e) => self.report.fail(record.name(), &e),
            }
        }
    }

    async fn consumables(&mut self, path: &[String], groups: &[ConsumableGroup]) {
        for group in groups {
            let mut group_path = path.to_vec();
            group_path.push(group.category.clone());
            self.items(&group_path, &group.items, consumable_payload, false)
                .await;
        }
    }

    async fn beasts(&mut self, path: &[String], beasts: &[Beast]) {
        for beast in beasts {
            let mut beast_path = path.to_vec();
            beast_path.push(beast.beast_type.clone());
            let Some(folder_id) = self.folder(&beast_path, FolderKind::Actor).await else {
                continue;
            };
            if let Err(e) = self.upload(beast).await {
                warn!(target: "save", name = beast.name.as_str(), error = ?e, "image not uploaded");
            }

            let mut equipment = Vec::new();
            for name in beast.equipment.iter().flatten() {
                match self.platform.find_item_by_name(name).await {
                    Ok(Some(item)) => equipment.push(item),
                    Ok(None) => {
                        debug!(
                            target: "save",
                            beast = beast.name.as_str(),
                            name = name.as_str(),
                            "equipment not found"
                        );
                        self.report.missing_equipment.push(name.clone());
                    }
                    Err(e) => self.report.fail(name, &e),
                }
            }

            let placement = Placement {
                image_path: self.image_path,
                folder_id: &folder_id,
                source: self.source,
            };
            let mapped = beast_actor(beast, equipment, &placement);
            let actor_id = match self.platform.create_actor(&mapped.actor).await {
                Ok(id) => id,
                Err(e) => {
                    self.report.fail(&beast.name, &e);
                    continue;
                }
            };
            self.report.created.push(beast.name.clone());
            for items in [&mapped.abilities, &mapped.equipment] {
                if items.is_empty() {
                    continue;
                }
                if let Err(e) = self.platform.create_embedded_items(&actor_id, items).await {
                    self.report.fail(&beast.name, &e);
                }
            }
        }
    }
}

pub(super) async fn save_records(
    platform: &dyn Platform,
    page: &PageSuccess,
    image_path: &str,
) -> SaveReport {
    let mut saver = Saver {
        platform,
        source: &page.source,
        image_path,
        report: SaveReport::default(),
    };
    let path = &page.folder;
    match &page.records {
        Records::Consumables(groups) => saver.consumables(path, groups).await,
        Records::Weapons(weapons) => saver.items(path, weapons, weapon_payload, true).await,
        Records::Armors(armors) => saver.items(path, armors, armor_payload, false).await,
        Records::Shields(shields) => saver.items(path, shields, shield_payload, false).await,
        Records::Accessories(accessories) => {
            saver
                .items(path, accessories, accessory_payload, false)
                .await
        }
        Records::WeaponModules(modules) => {
            saver
                .items(path, modules, weapon_module_payload, true)
                .await
        }
        Records::Beasts(beasts) => saver.beasts(path, beasts).await,
    }
    debug!(
        target: "save",
        page = page.page,
        created = saver.report.created.len(),
        failed = saver.report.failures.len(),
        "page saved"
    );
    saver.report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Accuracy, Affinity, BeastAttributes, DamageType, DieSize, Distance, Handed,
        ResistanceMap, Stat, WeaponCategory,
    };
    use crate::payload::ItemData;
    use crate::platform::{MemoryPlatform, MockPlatform};
    use pretty_assertions::assert_eq;

    fn sword(name: &str) -> Weapon {
        Weapon {
            image: ImageToken::new(64.0, 64.0),
            name: name.to_string(),
            martial: false,
            cost: 100,
            accuracy: Accuracy {
                primary: Stat::Dex,
                secondary: Stat::Mig,
                bonus: 0,
            },
            damage: 5,
            damage_type: DamageType::Physical,
            hands: Handed::OneHanded,
            melee: Distance::Melee,
            category: WeaponCategory::Sword,
            description: "No Quality.".to_string(),
        }
    }

    fn wolf(equipment: Option<Vec<String>>) -> Beast {
        Beast {
            image: ImageToken::new(64.0, 64.0),
            name: "Wolf".to_string(),
            level: 5,
            beast_type: "Beast".to_string(),
            description: "Hunts in packs.".to_string(),
            traits: "fast".to_string(),
            attributes: BeastAttributes {
                dex: DieSize::D8,
                ins: DieSize::D8,
                mig: DieSize::D8,
                wlp: DieSize::D6,
                max_hp: 60,
                crisis: 30,
                max_mp: 35,
                init: 8,
                def: 8,
                mdef: 8,
            },
            resists: ResistanceMap::default().with(DamageType::Ice, Affinity::Resistant),
            equipment,
            attacks: Vec::new(),
            spells: Vec::new(),
            other_actions: Vec::new(),
            special_rules: Vec::new(),
        }
    }

    fn page(folder: &[&str], records: Records) -> PageSuccess {
        PageSuccess {
            page: 132,
            source: "FUCR130".to_string(),
            folder: folder.iter().map(|s| s.to_string()).collect(),
            records,
        }
    }

    #[tokio::test]
    async fn test_weapons_are_created_in_their_folder() {
        let platform = MemoryPlatform::new();
        let page = page(
            &["Equipment", "Weapons", "Basic"],
            Records::Weapons(vec![sword("Longsword"), sword("Rapier")]),
        );
        let report = page.save(&platform, "images").await;

        assert_eq!(report.created, vec!["Longsword", "Rapier"]);
        assert!(report.is_clean());
        assert_eq!(
            platform.images(),
            vec!["images/Longsword.png", "images/Rapier.png"]
        );
        let folder = platform.folder_id(FolderKind::Item, &["Equipment", "Weapons", "Basic"]);
        let items = platform.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].folder, folder);
        assert_eq!(items[0].img.as_deref(), Some("images/Longsword.png"));
        match &items[0].data {
            ItemData::Weapon(system) => assert_eq!(system.source.value, "FUCR130"),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_beast_gets_type_folder_and_equipment() {
        let platform = MemoryPlatform::new();
        page(&["Equipment"], Records::Weapons(vec![sword("Bronze Sword")]))
            .save(&platform, "images")
            .await;

        let beasts = page(
            &["Beastiary"],
            Records::Beasts(vec![wolf(Some(vec![
                "bronze sword".to_string(),
                "silver ring".to_string(),
            ]))]),
        );
        let report = beasts.save(&platform, "images").await;

        assert_eq!(report.created, vec!["Wolf"]);
        assert_eq!(report.missing_equipment, vec!["silver ring"]);
        assert_eq!(platform.folders(FolderKind::Actor), vec!["Beastiary", "Beastiary/Beast"]);

        let actors = platform.actors();
        assert_eq!(actors.len(), 1);
        let (id, actor) = &actors[0];
        assert!(actor.system.use_equipment.value);
        let embedded = platform.embedded_items(id);
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].name, "Bronze Sword");
        assert!(embedded[0].equipped().is_some());
    }

    #[tokio::test]
    async fn test_failed_saves_do_not_stop_siblings() {
        let mut platform = MockPlatform::new();
        platform
            .expect_find_or_create_folder()
            .returning(|_, _| Ok("folder".to_string()));
        platform
            .expect_upload_image()
            .returning(|_, name, dest| {
                if name.starts_with("Broken") {
                    Err(PlatformError::UploadRejected(name.to_string()))
                } else {
                    Ok(format!("{dest}/{name}"))
                }
            });
        platform
            .expect_create_item()
            .times(2)
            .returning(|item| Ok(item.name.clone()));

        let page = page(
            &["Equipment"],
            Records::Weapons(vec![sword("Broken Blade"), sword("Longsword"), sword("Rapier")]),
        );
        let report = page.save(&platform, "images").await;

        assert_eq!(report.created, vec!["Longsword", "Rapier"]);
        assert_eq!(
            report.failures,
            vec![SaveFailure {
                name: "Broken Blade".to_string(),
                error: "Upload rejected: Broken Blade.png".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_armor_is_created_without_image() {
        let mut platform = MockPlatform::new();
        platform
            .expect_find_or_create_folder()
            .returning(|_, _| Ok("folder".to_string()));
        platform
            .expect_upload_image()
            .returning(|_, name, _| Err(PlatformError::UploadRejected(name.to_string())));
        platform
            .expect_create_item()
            .times(1)
            .returning(|item| Ok(item.name.clone()));

        let armor = Armor {
            image: ImageToken::new(64.0, 64.0),
            name: "Silk Shirt".to_string(),
            martial: false,
            cost: 100,
            def: 0,
            mdef: 2,
            init: -1,
            description: "No Quality.".to_string(),
        };
        let report = page(&["Equipment"], Records::Armors(vec![armor]))
            .save(&platform, "images")
            .await;
        assert_eq!(report.created, vec!["Silk Shirt"]);
        assert!(report.failures.is_empty());
    }
}
