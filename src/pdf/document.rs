//! [`PageSource`] backed by a `lopdf` document.

use super::lexer::{self, Font, Image, Resources};
use super::{PageSource, PdfError, PdfResult};
use crate::token::{ImageData, Token};
use async_trait::async_trait;
use dashmap::DashMap;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

pub struct PdfDocument {
    document: RwLock<Option<Document>>,
    pages: BTreeMap<u32, ObjectId>,
    lexed: DashMap<u32, Vec<Token>>,
}

impl PdfDocument {
    pub fn load(path: impl AsRef<Path>) -> PdfResult<Self> {
        Ok(Self::from_document(Document::load(path)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> PdfResult<Self> {
        Ok(Self::from_document(Document::load_mem(bytes)?))
    }

    pub fn from_document(document: Document) -> Self {
        let pages = document.get_pages();
        debug!(target: "pdf::document", pages = pages.len(), "document loaded");
        Self {
            document: RwLock::new(Some(document)),
            pages,
            lexed: DashMap::new(),
        }
    }

    fn lex_page(&self, page: u32) -> PdfResult<Vec<Token>> {
        let page_id = *self.pages.get(&page).ok_or(PdfError::PageNotFound(page))?;
        let guard = self
            .document
            .read()
            .map_err(|_| PdfError::Destroyed)?;
        let document = guard.as_ref().ok_or(PdfError::Destroyed)?;
        let content = Content::decode(&document.get_page_content(page_id)?)?;
        let resources = resources(document, page_id)?;
        Ok(lexer::lex(&content.operations, &resources))
    }
}

#[async_trait]
impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn tokens(&self, page: u32) -> PdfResult<Vec<Token>> {
        if let Some(tokens) = self.lexed.get(&page) {
            return Ok(tokens.clone());
        }
        let tokens = self.lex_page(page)?;
        self.lexed.insert(page, tokens.clone());
        Ok(tokens)
    }

    fn release(&self, page: u32) {
        self.lexed.remove(&page);
    }

    fn destroy(&self) {
        self.lexed.clear();
        if let Ok(mut document) = self.document.write() {
            document.take();
        }
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> PdfResult<&'a Object> {
    match object {
        Object::Reference(id) => Ok(document.get_object(*id)?),
        other => Ok(other),
    }
}

/// Fonts and image XObjects visible from the page, including inherited
/// resource dictionaries.
fn resources(document: &Document, page_id: ObjectId) -> PdfResult<Resources> {
    let fonts = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| {
            let base_font = font
                .get(b"BaseFont")
                .and_then(Object::as_name_str)
                .unwrap_or_default()
                .to_string();
            let encoding = Some(font.get_font_encoding().to_string());
            (name, Font { base_font, encoding })
        })
        .collect();

    let (own, inherited) = document.get_page_resources(page_id);
    let mut dictionaries: Vec<&Dictionary> = own.into_iter().collect();
    for id in inherited {
        if let Ok(dictionary) = document.get_dictionary(id) {
            dictionaries.push(dictionary);
        }
    }

    let mut images = HashMap::new();
    for dictionary in dictionaries {
        let Ok(xobjects) = dictionary.get(b"XObject") else {
            continue;
        };
        let Ok(xobjects) = resolve(document, xobjects)?.as_dict() else {
            continue;
        };
        for (name, xobject) in xobjects.iter() {
            if images.contains_key(name) {
                continue;
            }
            let Ok(stream) = resolve(document, xobject)?.as_stream() else {
                continue;
            };
            if let Some(image) = image(stream)? {
                images.insert(name.clone(), image);
            }
        }
    }
    Ok(Resources { fonts, images })
}

fn dimension(stream: &Stream, key: &[u8]) -> Option<u32> {
    stream
        .dict
        .get(key)
        .and_then(Object::as_i64)
        .ok()
        .and_then(|v| u32::try_from(v).ok())
}

fn filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(names)) => names
            .iter()
            .filter_map(|n| n.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn image(stream: &Stream) -> PdfResult<Option<Image>> {
    let is_image = stream
        .dict
        .get(b"Subtype")
        .and_then(Object::as_name)
        .map(|subtype| subtype == b"Image")
        .unwrap_or(false);
    if !is_image {
        return Ok(None);
    }
    let (Some(width), Some(height)) = (dimension(stream, b"Width"), dimension(stream, b"Height"))
    else {
        return Ok(None);
    };
    Ok(Some(Image {
        width: f64::from(width),
        height: f64::from(height),
        data: Arc::new(encode(stream, width, height)?),
    }))
}

/// JPEG and JPEG 2000 streams are kept as they are. Raw 8-bit gray or RGB
/// samples are encoded as PNG. Anything else is left without data.
fn encode(stream: &Stream, width: u32, height: u32) -> PdfResult<ImageData> {
    let filters = filters(stream);
    for (filter, extension) in [(&b"DCTDecode"[..], "jpg"), (&b"JPXDecode"[..], "jp2")] {
        if filters.iter().any(|f| f == filter) {
            return Ok(ImageData {
                extension: extension.to_string(),
                bytes: stream.content.clone(),
            });
        }
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        match stream.decompressed_content() {
            Ok(samples) => samples,
            Err(e) => {
                warn!(target: "pdf::document", error = ?e, "undecodable image");
                return Ok(ImageData::default());
            }
        }
    };
    let pixels = width as usize * height as usize;
    let image = if samples.len() == pixels * 3 {
        RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
    } else if samples.len() == pixels {
        GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
    } else {
        None
    };
    let Some(image) = image else {
        return Ok(ImageData::default());
    };
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(ImageData {
        extension: "png".to_string(),
        bytes,
    })
}
