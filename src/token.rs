//! Tokens produced by lexing a PDF page.
//!
//! A page is reduced to the images it paints and the strings it shows, in
//! drawing order. The font of a string is the only structural hint the
//! grammars get: body text, labels and glyphs used as icons all differ by
//! font alone.

use crate::analyzer::core::Describe;
use serde::Serialize;
use std::sync::Arc;

/// Encoded bytes of an image XObject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageData {
    /// File extension matching the encoding, e.g. `jpg` for DCT streams.
    pub extension: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageToken {
    pub width: f64,
    pub height: f64,
    /// Vertical position on the page, origin at the bottom.
    pub y: f64,
    #[serde(skip)]
    pub data: Arc<ImageData>,
}

impl ImageToken {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            y: 0.0,
            data: Arc::default(),
        }
    }

    pub fn at(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// File name the image is stored under for an entity called `name`.
    pub fn file_name(&self, name: &str) -> String {
        let extension = match self.data.extension.as_str() {
            "" => "png",
            extension => extension,
        };
        format!("{name}.{extension}")
    }
}

// Image payloads are not part of record identity.
impl PartialEq for ImageToken {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.y == other.y
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextToken {
    pub text: String,
    pub font: String,
}

impl TextToken {
    /// Font names carry a subset prefix (`FBDLWO+PTSans-Narrow`), so fonts
    /// are matched by suffix.
    pub fn font_ends_with(&self, suffix: &str) -> bool {
        self.font.ends_with(suffix)
    }

    pub fn font_is_any(&self, suffixes: &[&str]) -> bool {
        suffixes.iter().any(|suffix| self.font_ends_with(suffix))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Image(ImageToken),
    Text(TextToken),
}

impl Token {
    pub fn text(text: impl Into<String>, font: impl Into<String>) -> Self {
        Token::Text(TextToken {
            text: text.into(),
            font: font.into(),
        })
    }

    pub fn image(width: f64, height: f64) -> Self {
        Token::Image(ImageToken::new(width, height))
    }

    pub fn as_text(&self) -> Option<&TextToken> {
        match self {
            Token::Text(t) => Some(t),
            Token::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageToken> {
        match self {
            Token::Image(i) => Some(i),
            Token::Text(_) => None,
        }
    }
}

impl Describe for Token {
    fn describe(&self) -> String {
        match self {
            Token::Image(_) => "<Image>".to_string(),
            Token::Text(t) => format!("<Text str=\"{}\" font=\"{}\">", t.text, t.font),
        }
    }
}

/// Font suffixes the rulebook layout relies on.
pub mod fonts {
    pub const BODY: &str = "PTSans-Narrow";
    pub const BODY_BOLD: &str = "PTSans-NarrowBold";
    pub const ICONS: &str = "Heydings-Icons";
    pub const KOZMIN: &str = "KozMinPro-Regular";
    pub const SEPARATOR: &str = "Wingdings-Regular";
    pub const BASIC_SHAPES: &str = "FnT_BasicShapes1";
    pub const WATERMARK: &str = "Helvetica";
    pub const EVILZ: &str = "Evilz";
    pub const FABULA: &str = "fabulaultima";
    pub const WEB_SYMBOLS: &str = "WebSymbols-Regular";
    pub const CORSIVA: &str = "MonotypeCorsiva";
    pub const ANTONIO_BOLD: &str = "Antonio-Bold";
    pub const ANTONIO_REGULAR: &str = "Antonio-Regular";
    pub const CREDIT_VALLEY: &str = "CreditValley";
    pub const BODONI_ORNAMENTS: &str = "BodoniOrnaments";

    /// Fonts a wrapped description line may continue in.
    pub const DESCRIPTION: [&str; 4] = [BODY, BODY_BOLD, ICONS, KOZMIN];
}
