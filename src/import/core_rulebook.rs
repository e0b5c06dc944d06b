//! Core rulebook import: one grammar per configured page.

use super::{PageResult, PageSuccess, Records};
use crate::analyzer::parsers::{
    accessory::parse_accessory_page, armor::parse_armor_page, beast::parse_bestiary_page,
    consumable::parse_consumables_page, shield::parse_shield_page,
    weapon::{parse_basic_weapons_page, parse_rare_weapons_page},
};
use crate::analyzer::{classify, PageParse, Parser};
use crate::config::{Grammar, ImportConfig};
use crate::pdf::PageSource;
use crate::platform::folder_path;
use crate::token::Token;
use futures::future::join_all;
use tracing::{info, warn};

/// Parses `tokens` with the grammar of a page layout.
pub fn parse_page(grammar: Grammar, tokens: &[Token]) -> PageParse<Records> {
    match grammar {
        Grammar::Consumables => {
            classify(parse_consumables_page().parse(tokens, 0)).map(Records::Consumables)
        }
        Grammar::BasicWeapons => {
            classify(parse_basic_weapons_page().parse(tokens, 0)).map(Records::Weapons)
        }
        Grammar::RareWeapons => {
            classify(parse_rare_weapons_page().parse(tokens, 0)).map(Records::Weapons)
        }
        Grammar::Armor => classify(parse_armor_page().parse(tokens, 0)).map(Records::Armors),
        Grammar::Shields => classify(parse_shield_page().parse(tokens, 0)).map(Records::Shields),
        Grammar::Accessories => {
            classify(parse_accessory_page().parse(tokens, 0)).map(Records::Accessories)
        }
        Grammar::Beasts => classify(parse_bestiary_page().parse(tokens, 0)).map(Records::Beasts),
    }
}

async fn import_page(
    pages: &dyn PageSource,
    config: &ImportConfig,
    page: u32,
    grammar: Grammar,
    folder: &str,
) -> PageResult {
    let result = match pages.tokens(page).await {
        Ok(tokens) => match parse_page(grammar, &tokens) {
            PageParse::Success(records) => PageResult::Success(PageSuccess {
                page,
                source: config.source(&config.source_prefix, page),
                folder: folder_path(folder),
                records,
            }),
            PageParse::TooMany { count, failures } => PageResult::TooMany {
                page,
                count,
                failures,
            },
            PageParse::Failure(failures) => PageResult::Failure { page, failures },
        },
        Err(e) => {
            warn!(target: "import::core", page, error = ?e, "page not readable");
            PageResult::error(page, e)
        }
    };
    if !result.is_success() {
        pages.release(page);
    }
    info!(target: "import::core", page, %grammar, outcome = result.label(), "page parsed");
    result
}

/// Parses every configured rulebook page, in page order.
pub async fn import_core_rulebook(
    pages: &dyn PageSource,
    config: &ImportConfig,
) -> Vec<PageResult> {
    let table = config.rulebook_table();
    info!(target: "import::core", pages = table.len(), "importing core rulebook");
    join_all(
        table
            .into_iter()
            .map(|(page, grammar, folder)| import_page(pages, config, page, grammar, folder)),
    )
    .await
}
