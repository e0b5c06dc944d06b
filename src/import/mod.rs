//! Import orchestration.
//!
//! A page is lexed, parsed and classified into a [`PageResult`]. Successful
//! pages carry their records and are saved on request, so a caller can
//! review the whole report before anything is written to the platform.

pub mod atlas;
pub mod core_rulebook;
pub mod save;

pub use atlas::import_atlas;
pub use core_rulebook::{import_core_rulebook, parse_page};
pub use save::{SaveFailure, SaveReport};

use crate::analyzer::ParseFailure;
use crate::atlas::AtlasItems;
use crate::model::{Accessory, Armor, Beast, ConsumableGroup, Shield, Weapon, WeaponModule};
use crate::pdf::PageSource;
use crate::platform::Platform;
use serde::Serialize;

/// Records read from one page, or one atlas category table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "camelCase")]
pub enum Records {
    Consumables(Vec<ConsumableGroup>),
    Weapons(Vec<Weapon>),
    Armors(Vec<Armor>),
    Shields(Vec<Shield>),
    Accessories(Vec<Accessory>),
    WeaponModules(Vec<WeaponModule>),
    Beasts(Vec<Beast>),
}

impl Records {
    /// Names of every record, consumables flattened out of their groups.
    pub fn names(&self) -> Vec<&str> {
        fn collect_names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<&str> {
            items.iter().map(name).collect()
        }
        match self {
            Records::Consumables(groups) => groups
                .iter()
                .flat_map(|group| group.items.iter().map(|c| c.name.as_str()))
                .collect(),
            Records::Weapons(items) => collect_names(items, |w| w.name.as_str()),
            Records::Armors(items) | Records::Shields(items) => {
                collect_names(items, |a| a.name.as_str())
            }
            Records::Accessories(items) => collect_names(items, |a| a.name.as_str()),
            Records::WeaponModules(items) => collect_names(items, |m| m.name.as_str()),
            Records::Beasts(items) => collect_names(items, |b| b.name.as_str()),
        }
    }
}

impl From<AtlasItems> for Records {
    fn from(items: AtlasItems) -> Self {
        match items {
            AtlasItems::Weapons(items) => Records::Weapons(items),
            AtlasItems::Armors(items) => Records::Armors(items),
            AtlasItems::Shields(items) => Records::Shields(items),
            AtlasItems::Accessories(items) => Records::Accessories(items),
            AtlasItems::WeaponModules(items) => Records::WeaponModules(items),
        }
    }
}

/// A parsed page waiting to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSuccess {
    pub page: u32,
    /// Source tag stamped on every created entity.
    pub source: String,
    pub folder: Vec<String>,
    pub records: Records,
}

impl PageSuccess {
    /// Writes the records to `platform`, uploading images under
    /// `image_path`.
    pub async fn save(&self, platform: &dyn Platform, image_path: &str) -> SaveReport {
        save::save_records(platform, self, image_path).await
    }

    /// Releases the page once its records are no longer needed.
    pub fn cleanup(&self, pages: &dyn PageSource) {
        pages.release(self.page);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    Success(PageSuccess),
    Failure {
        page: u32,
        failures: Vec<ParseFailure>,
    },
    TooMany {
        page: u32,
        count: usize,
        failures: Vec<ParseFailure>,
    },
}

impl PageResult {
    pub fn page(&self) -> u32 {
        match self {
            PageResult::Success(success) => success.page,
            PageResult::Failure { page, .. } | PageResult::TooMany { page, .. } => *page,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PageResult::Success(_))
    }

    /// A page that could not be read at all.
    fn error(page: u32, error: impl std::fmt::Display) -> Self {
        PageResult::Failure {
            page,
            failures: vec![ParseFailure {
                found: String::new(),
                error: error.to_string(),
                distance: 0,
            }],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PageResult::Success(_) => "success",
            PageResult::Failure { .. } => "failure",
            PageResult::TooMany { .. } => "too many",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Consumable, ConsumableGroup};
    use crate::token::ImageToken;

    #[test]
    fn test_consumable_names_are_flattened() {
        let consumable = |name: &str| Consumable {
            image: ImageToken::new(1.0, 1.0),
            name: name.to_string(),
            ip_cost: 2,
            description: "Heals.".to_string(),
        };
        let records = Records::Consumables(vec![
            ConsumableGroup {
                category: "Potions".to_string(),
                items: vec![consumable("Elixir"), consumable("Remedy")],
            },
            ConsumableGroup {
                category: "Utility".to_string(),
                items: vec![consumable("Magic Tent")],
            },
        ]);
        assert_eq!(records.names(), vec!["Elixir", "Remedy", "Magic Tent"]);
    }

    #[test]
    fn test_unreadable_page_is_a_failure() {
        let result = PageResult::error(12, "Page 12 not found");
        assert_eq!(result.page(), 12);
        assert_eq!(result.label(), "failure");
        match result {
            PageResult::Failure { failures, .. } => {
                assert_eq!(failures[0].error, "Page 12 not found");
                assert_eq!(failures[0].distance, 0);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
