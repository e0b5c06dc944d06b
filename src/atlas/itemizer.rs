//! Splits an atlas page into per-item runs of text.
//!
//! Atlas tables are not parsed with a grammar. Text tokens are grouped by
//! the category header they follow, cut into items at sentence ends, and
//! matched with the page's images by vertical position.

use crate::model::ItemCategory;
use crate::token::{fonts, ImageToken, TextToken, Token};
use tracing::debug;

/// Text of a single table row and the image drawn next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTokens {
    pub image: Option<ImageToken>,
    pub strings: Vec<TextToken>,
}

impl ItemTokens {
    pub fn text(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|t| t.text.as_str())
    }
}

/// Fonts of page furniture: watermark, page numbers and table headers.
const FURNITURE: [&str; 4] = [
    fonts::WATERMARK,
    fonts::ANTONIO_REGULAR,
    fonts::ANTONIO_BOLD,
    fonts::BODONI_ORNAMENTS,
];

fn is_item_element(token: &TextToken) -> bool {
    !FURNITURE.iter().any(|font| token.font.contains(font))
}

/// Groups text by category header, in order of first appearance.
///
/// A header seen twice disables collection until the next new header; the
/// PDF repeats the previous page's text without its images.
fn divide_by_category(texts: &[&TextToken]) -> Vec<(ItemCategory, Vec<TextToken>)> {
    let mut groups: Vec<(ItemCategory, Vec<TextToken>)> = Vec::new();
    let mut current: Option<usize> = None;
    let mut skipping = false;

    for token in texts {
        if let Ok(category) = token.text.parse::<ItemCategory>() {
            match groups.iter().position(|(c, _)| *c == category) {
                Some(index) => {
                    debug!(
                        target: "atlas::itemizer",
                        %category,
                        "repeated category header, skipping"
                    );
                    current = Some(index);
                    skipping = true;
                }
                None => {
                    groups.push((category, Vec::new()));
                    current = Some(groups.len() - 1);
                    skipping = false;
                }
            }
        } else if let Some(index) = current {
            if is_item_element(token) && !skipping {
                groups[index].1.push((*token).clone());
            }
        }
    }
    groups
}

/// A sentence end closes an item unless the next line continues it.
fn is_last_item_token(strings: &[TextToken], index: usize) -> bool {
    let continues = strings.get(index + 1).is_some_and(|next| {
        next.font_ends_with(fonts::BODY) || next.font.contains(fonts::SEPARATOR)
    });
    strings[index].text.ends_with('.') && !continues
}

fn group_items(strings: Vec<TextToken>) -> Vec<Vec<TextToken>> {
    let mut items: Vec<Vec<TextToken>> = Vec::new();
    let mut open = false;
    for (index, token) in strings.iter().enumerate() {
        if !open {
            items.push(Vec::new());
            open = true;
        }
        if let Some(item) = items.last_mut() {
            item.push(token.clone());
        }
        if is_last_item_token(&strings, index) {
            open = false;
        }
    }
    items
}

/// Itemizes a page. Categories keep the order in which their headers first
/// appear; images are handed out top to bottom in that order.
pub fn itemize(tokens: &[Token]) -> Vec<(ItemCategory, Vec<ItemTokens>)> {
    let texts: Vec<&TextToken> = tokens.iter().filter_map(Token::as_text).collect();
    let mut images: Vec<ImageToken> = tokens.iter().filter_map(Token::as_image).cloned().collect();
    images.sort_by(|a, b| b.y.total_cmp(&a.y));
    let mut images = images.into_iter();

    divide_by_category(&texts)
        .into_iter()
        .map(|(category, strings)| {
            let items = group_items(strings)
                .into_iter()
                .map(|strings| ItemTokens {
                    image: images.next(),
                    strings,
                })
                .collect::<Vec<_>>();
            (category, items)
        })
        .collect()
}
