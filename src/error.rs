use thiserror::Error;

use crate::atlas::AtlasError;
use crate::config::ConfigError;
use crate::pdf::PdfError;
use crate::platform::PlatformError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),
    #[error("Atlas error: {0}")]
    Atlas(#[from] AtlasError),
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ImportResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
