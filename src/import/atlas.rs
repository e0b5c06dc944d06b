//! Atlas import: every category table on a book page becomes its own result.

use super::{PageResult, PageSuccess, Records};
use crate::atlas::{parse_atlas_page, AtlasItems};
use crate::config::{AtlasBook, ImportConfig};
use crate::model::ItemCategory;
use crate::pdf::PageSource;
use futures::future::join_all;
use tracing::{info, warn};

fn category_folder(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Weapon => "Weapons",
        ItemCategory::Armor => "Armors",
        ItemCategory::Shield => "Shields",
        ItemCategory::Accessory => "Accessories",
        ItemCategory::WeaponModule => "Weapon Modules",
    }
}

fn success(book: &AtlasBook, config: &ImportConfig, page: u32, items: AtlasItems) -> PageResult {
    let folder = vec![
        book.folder.clone(),
        category_folder(items.category()).to_string(),
    ];
    PageResult::Success(PageSuccess {
        page,
        source: config.source(book.book.as_ref(), page),
        folder,
        records: Records::from(items),
    })
}

async fn import_page(
    pages: &dyn PageSource,
    book: &AtlasBook,
    config: &ImportConfig,
    page: u32,
) -> Vec<PageResult> {
    let parsed = match pages.tokens(page).await {
        Ok(tokens) => parse_atlas_page(&tokens).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match parsed {
        Ok(tables) => {
            info!(target: "import::atlas", page, tables = tables.len(), "page parsed");
            tables
                .into_iter()
                .map(|items| success(book, config, page, items))
                .collect()
        }
        Err(error) => {
            warn!(target: "import::atlas", page, %error, "page rejected");
            pages.release(page);
            vec![PageResult::error(page, error)]
        }
    }
}

/// Parses the equipment pages of an atlas book. A page yields one result
/// per category table, so the output may be longer than the page list.
pub async fn import_atlas(
    pages: &dyn PageSource,
    book: &AtlasBook,
    config: &ImportConfig,
) -> Vec<PageResult> {
    info!(target: "import::atlas", book = %book.book, pages = book.pages.len(), "importing atlas");
    join_all(
        book.pages
            .iter()
            .map(|&page| import_page(pages, book, config, page)),
    )
    .await
    .into_iter()
    .flatten()
    .collect()
}
