use super::{FolderKind, Platform, PlatformError, PlatformResult};
use crate::payload::{ActorPayload, ItemPayload};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Writes documents as JSON files under a root directory.
///
/// Folders are directories below `items/` or `actors/`, and their ids are
/// paths relative to the root. An actor's embedded items are written next
/// to it as `<actor>.items.json`.
#[derive(Debug)]
pub struct DirectoryPlatform {
    root: PathBuf,
    by_name: DashMap<String, ItemPayload>,
}

fn kind_dir(kind: FolderKind) -> &'static str {
    match kind {
        FolderKind::Item => "items",
        FolderKind::Actor => "actors",
    }
}

/// File-system safe form of a document name. Empty and dot-only names
/// would point at the folder itself or its parent, so their dots become
/// dashes too.
fn file_stem(name: &str) -> String {
    let dot_only = name.chars().all(|c| c == '.');
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            '.' if dot_only => '-',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "-".to_string()
    } else {
        stem
    }
}

fn collect_items(dir: &Path, found: &mut Vec<ItemPayload>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_items(&path, found)?;
        } else if path.extension().is_some_and(|e| e == "json") {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<ItemPayload>(&content) {
                Ok(item) => found.push(item),
                Err(e) => warn!(target: "platform::directory", ?path, error = ?e, "skipping item"),
            }
        }
    }
    Ok(())
}

impl DirectoryPlatform {
    /// Opens `root`, indexing the items already stored there.
    pub fn open(root: impl Into<PathBuf>) -> PlatformResult<Self> {
        let root = root.into();
        let items_dir = root.join(kind_dir(FolderKind::Item));
        std::fs::create_dir_all(&items_dir)?;
        std::fs::create_dir_all(root.join(kind_dir(FolderKind::Actor)))?;

        let mut items = Vec::new();
        collect_items(&items_dir, &mut items)?;
        debug!(target: "platform::directory", root = ?root, items = items.len(), "opened");

        let by_name = DashMap::new();
        for item in items {
            by_name.insert(item.name.to_lowercase(), item);
        }
        Ok(Self { root, by_name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write<T: Serialize>(
        &self,
        folder: &str,
        name: &str,
        value: &T,
    ) -> PlatformResult<String> {
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir).await?;
        let id = format!("{folder}/{}.json", file_stem(name));
        fs::write(self.root.join(&id), serde_json::to_vec_pretty(value)?).await?;
        Ok(id)
    }
}

#[async_trait]
impl Platform for DirectoryPlatform {
    async fn create_item(&self, payload: &ItemPayload) -> PlatformResult<String> {
        let folder = payload
            .folder
            .clone()
            .unwrap_or_else(|| kind_dir(FolderKind::Item).to_string());
        let id = self.write(&folder, &payload.name, payload).await?;
        self.by_name
            .insert(payload.name.to_lowercase(), payload.clone());
        Ok(id)
    }

    async fn create_actor(&self, payload: &ActorPayload) -> PlatformResult<String> {
        self.write(&payload.folder, &payload.name, payload).await
    }

    async fn find_or_create_folder(
        &self,
        path: &[String],
        kind: FolderKind,
    ) -> PlatformResult<String> {
        let id = std::iter::once(kind_dir(kind).to_string())
            .chain(path.iter().map(|segment| file_stem(segment)))
            .collect::<Vec<_>>()
            .join("/");
        fs::create_dir_all(self.root.join(&id)).await?;
        Ok(id)
    }

    async fn upload_image(
        &self,
        bytes: &[u8],
        file_name: &str,
        destination: &str,
    ) -> PlatformResult<String> {
        if bytes.is_empty() {
            return Err(PlatformError::UploadRejected(file_name.to_string()));
        }
        fs::create_dir_all(self.root.join(destination)).await?;
        let path = format!("{destination}/{}", file_stem(file_name));
        fs::write(self.root.join(&path), bytes).await?;
        Ok(path)
    }

    async fn create_embedded_items(
        &self,
        actor_id: &str,
        items: &[ItemPayload],
    ) -> PlatformResult<()> {
        let actor = self.root.join(actor_id);
        if !fs::try_exists(&actor).await? {
            return Err(PlatformError::ActorNotFound(actor_id.to_string()));
        }
        let target = actor.with_extension("items.json");
        let mut embedded: Vec<ItemPayload> = match fs::read_to_string(&target).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        embedded.extend(items.iter().cloned());
        fs::write(&target, serde_json::to_vec_pretty(&embedded)?).await?;
        Ok(())
    }

    async fn find_item_by_name(&self, name: &str) -> PlatformResult<Option<ItemPayload>> {
        Ok(self
            .by_name
            .get(&name.to_lowercase())
            .map(|item| item.clone()))
    }
}
