//! Page sources: PDF documents lexed into per-page token streams.

pub mod document;
pub mod lexer;

pub use document::PdfDocument;

use crate::token::Token;
use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Page {0} not found")]
    PageNotFound(u32),
    #[error("Document was destroyed")]
    Destroyed,
}

pub type PdfResult<T> = Result<T, PdfError>;

/// A document whose pages can be lexed one at a time. Pages are numbered
/// from 1.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> u32;

    async fn tokens(&self, page: u32) -> PdfResult<Vec<Token>>;

    /// Drops what was kept for `page`.
    fn release(&self, page: u32);

    /// Releases the whole document.
    fn destroy(&self);
}

/// Pages that were lexed up front.
#[derive(Debug, Default)]
pub struct TokenPages {
    pages: DashMap<u32, Vec<Token>>,
    count: u32,
}

impl TokenPages {
    pub fn new(pages: impl IntoIterator<Item = (u32, Vec<Token>)>) -> Self {
        let pages: DashMap<u32, Vec<Token>> = pages.into_iter().collect();
        let count = pages.iter().map(|entry| *entry.key()).max().unwrap_or(0);
        Self { pages, count }
    }

    pub fn is_loaded(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }
}

#[async_trait]
impl PageSource for TokenPages {
    fn page_count(&self) -> u32 {
        self.count
    }

    async fn tokens(&self, page: u32) -> PdfResult<Vec<Token>> {
        self.pages
            .get(&page)
            .map(|tokens| tokens.clone())
            .ok_or(PdfError::PageNotFound(page))
    }

    fn release(&self, page: u32) {
        self.pages.remove(&page);
    }

    fn destroy(&self) {
        self.pages.clear();
    }
}
