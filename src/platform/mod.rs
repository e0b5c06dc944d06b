//! The game platform the imported entities are written to.
//!
//! Only a narrow create/query surface is needed: folders, images, items,
//! actors and the items embedded in an actor. [`DirectoryPlatform`] writes
//! JSON documents to disk, [`MemoryPlatform`] keeps everything in memory.

pub mod directory;
pub mod memory;

pub use directory::DirectoryPlatform;
pub use memory::MemoryPlatform;

use crate::payload::{ActorPayload, ItemPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Actor not found: {0}")]
    ActorNotFound(String),
    #[error("Upload rejected: {0}")]
    UploadRejected(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Folders are typed by the documents they hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum FolderKind {
    Item,
    Actor,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Platform: Send + Sync {
    /// Creates an item and returns its id.
    async fn create_item(&self, payload: &ItemPayload) -> PlatformResult<String>;

    /// Creates an actor and returns its id.
    async fn create_actor(&self, payload: &ActorPayload) -> PlatformResult<String>;

    /// Returns the id of the folder at `path`, creating every missing
    /// folder on the way.
    async fn find_or_create_folder(&self, path: &[String], kind: FolderKind)
        -> PlatformResult<String>;

    /// Stores an image under `destination` and returns its path.
    async fn upload_image(
        &self,
        bytes: &[u8],
        file_name: &str,
        destination: &str,
    ) -> PlatformResult<String>;

    async fn create_embedded_items(
        &self,
        actor_id: &str,
        items: &[ItemPayload],
    ) -> PlatformResult<()>;

    /// Case-insensitive lookup among the items created so far.
    async fn find_item_by_name(&self, name: &str) -> PlatformResult<Option<ItemPayload>>;
}

/// Splits `Equipment/Weapons/Basic` into its folder names.
pub fn folder_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
