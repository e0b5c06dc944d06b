use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid page range {first}-{last}")]
    InvalidRange { first: u32, last: u32 },
    #[error("Page {page} precedes the page offset {offset}")]
    PageBeforeOffset { page: u32, offset: u32 },
}

/// Page layouts of the core rulebook.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Grammar {
    Consumables,
    BasicWeapons,
    RareWeapons,
    Armor,
    Shields,
    Accessories,
    Beasts,
}

/// Consecutive rulebook pages sharing a layout and a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub first: u32,
    pub last: u32,
    pub grammar: Grammar,
    /// `/`-separated folder path.
    pub folder: String,
}

impl PageRange {
    fn new(first: u32, last: u32, grammar: Grammar, folder: &str) -> Self {
        Self {
            first,
            last,
            grammar,
            folder: folder.to_string(),
        }
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BookType {
    Fuhf,
    Futf,
    Funf,
}

/// Equipment pages of one atlas book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasBook {
    pub book: BookType,
    pub pages: Vec<u32>,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_rulebook_pages")]
    pub rulebook_pages: Vec<PageRange>,

    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    /// Printed page numbers trail the PDF's by this much.
    #[serde(default = "default_page_offset")]
    pub page_offset: u32,

    #[serde(default = "default_atlas_books")]
    pub atlas_books: Vec<AtlasBook>,

    #[serde(default = "default_image_path")]
    pub image_path: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            rulebook_pages: default_rulebook_pages(),
            source_prefix: default_source_prefix(),
            page_offset: default_page_offset(),
            atlas_books: default_atlas_books(),
            image_path: default_image_path(),
        }
    }
}

impl ImportConfig {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(target: "config", ?path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for range in &self.rulebook_pages {
            if range.first > range.last {
                return Err(ConfigError::InvalidRange {
                    first: range.first,
                    last: range.last,
                });
            }
        }
        let pages = self
            .rulebook_pages
            .iter()
            .map(|range| range.first)
            .chain(self.atlas_books.iter().flat_map(|b| b.pages.iter().copied()));
        for page in pages {
            if page <= self.page_offset {
                return Err(ConfigError::PageBeforeOffset {
                    page,
                    offset: self.page_offset,
                });
            }
        }
        Ok(())
    }

    /// Every configured rulebook page with its grammar and folder path.
    pub fn rulebook_table(&self) -> Vec<(u32, Grammar, &str)> {
        let mut table: Vec<(u32, Grammar, &str)> = self
            .rulebook_pages
            .iter()
            .flat_map(|range| {
                range
                    .pages()
                    .map(move |page| (page, range.grammar, range.folder.as_str()))
            })
            .collect();
        table.sort_by_key(|(page, _, _)| *page);
        table
    }

    pub fn atlas_book(&self, book: BookType) -> Option<&AtlasBook> {
        self.atlas_books.iter().find(|b| b.book == book)
    }

    /// Source tag of a page, e.g. `FUCR104` for PDF page 106.
    pub fn source(&self, prefix: &str, page: u32) -> String {
        format!("{prefix}{}", page.saturating_sub(self.page_offset))
    }
}

fn default_rulebook_pages() -> Vec<PageRange> {
    vec![
        PageRange::new(106, 106, Grammar::Consumables, "Equipment/Consumables"),
        PageRange::new(132, 133, Grammar::BasicWeapons, "Equipment/Weapons/Basic"),
        PageRange::new(134, 134, Grammar::Armor, "Equipment/Armors/Basic"),
        PageRange::new(135, 135, Grammar::Shields, "Equipment/Shields/Basic"),
        PageRange::new(272, 281, Grammar::RareWeapons, "Equipment/Weapons/Rare"),
        PageRange::new(283, 284, Grammar::Armor, "Equipment/Armors/Rare"),
        PageRange::new(285, 285, Grammar::Shields, "Equipment/Shields/Rare"),
        PageRange::new(287, 289, Grammar::Accessories, "Equipment/Accessories"),
        PageRange::new(326, 355, Grammar::Beasts, "Beastiary"),
    ]
}

fn default_source_prefix() -> String {
    "FUCR".to_string()
}

fn default_page_offset() -> u32 {
    2
}

fn default_atlas_books() -> Vec<AtlasBook> {
    vec![
        AtlasBook {
            book: BookType::Fuhf,
            pages: (80..=83).collect(),
            folder: "High Fantasy Equipment".to_string(),
        },
        AtlasBook {
            book: BookType::Futf,
            pages: (84..=89).collect(),
            folder: "Techno Fantasy Equipment".to_string(),
        },
        AtlasBook {
            book: BookType::Funf,
            pages: (86..=89).collect(),
            folder: "Natural Fantasy Equipment".to_string(),
        },
    ]
}

fn default_image_path() -> String {
    "images".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_rulebook_table() {
        let config = ImportConfig::default();
        let table = config.rulebook_table();
        assert_eq!(table.len(), 1 + 2 + 1 + 1 + 10 + 2 + 1 + 3 + 30);
        assert_eq!(table[0], (106, Grammar::Consumables, "Equipment/Consumables"));
        assert_eq!(table.last(), Some(&(355, Grammar::Beasts, "Beastiary")));
        assert_eq!(config.source("FUCR", 106), "FUCR104");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = ImportConfig::load("/nonexistent/fabula-import.json").unwrap();
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "rulebook_pages": [
                    {{ "first": 10, "last": 11, "grammar": "basic-weapons", "folder": "Weapons" }}
                ],
                "image_path": "assets/fabula"
            }}"#
        )
        .unwrap();

        let config = ImportConfig::load(file.path()).unwrap();
        assert_eq!(
            config.rulebook_table(),
            vec![
                (10, Grammar::BasicWeapons, "Weapons"),
                (11, Grammar::BasicWeapons, "Weapons")
            ]
        );
        assert_eq!(config.image_path, "assets/fabula");
        assert_eq!(config.page_offset, 2);
        assert_eq!(config.atlas_book(BookType::Funf).map(|b| b.pages.len()), Some(4));
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        let reversed = r#"{ "rulebook_pages": [
            { "first": 20, "last": 10, "grammar": "armor", "folder": "Armors" }
        ] }"#;
        assert!(matches!(
            ImportConfig::from_json(reversed),
            Err(ConfigError::InvalidRange { first: 20, last: 10 })
        ));

        let early = r#"{ "rulebook_pages": [
            { "first": 1, "last": 3, "grammar": "armor", "folder": "Armors" }
        ] }"#;
        assert!(matches!(
            ImportConfig::from_json(early),
            Err(ConfigError::PageBeforeOffset { page: 1, offset: 2 })
        ));
    }

    #[test]
    fn test_book_type_spelling() {
        assert_eq!("FUTF".parse::<BookType>(), Ok(BookType::Futf));
        assert_eq!(BookType::Fuhf.to_string(), "FUHF");
        assert_eq!(
            serde_json::to_string(&BookType::Funf).unwrap(),
            "\"FUNF\""
        );
    }
}
