use super::{FolderKind, Platform, PlatformError, PlatformResult};
use crate::payload::{ActorPayload, ItemPayload};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// Keeps every created document in memory.
#[derive(Debug, Default)]
pub struct MemoryPlatform {
    items: DashMap<String, ItemPayload>,
    actors: DashMap<String, ActorPayload>,
    folders: DashMap<(FolderKind, Vec<String>), String>,
    images: DashMap<String, Vec<u8>>,
    embedded: DashMap<String, Vec<ItemPayload>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Created items ordered by name.
    pub fn items(&self) -> Vec<ItemPayload> {
        let mut items: Vec<ItemPayload> = self.items.iter().map(|e| e.value().clone()).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Created actors ordered by name, with their ids.
    pub fn actors(&self) -> Vec<(String, ActorPayload)> {
        let mut actors: Vec<(String, ActorPayload)> = self
            .actors
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        actors.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        actors
    }

    /// Folder paths created so far, joined with `/`.
    pub fn folders(&self, kind: FolderKind) -> Vec<String> {
        let mut folders: Vec<String> = self
            .folders
            .iter()
            .filter(|e| e.key().0 == kind)
            .map(|e| e.key().1.join("/"))
            .collect();
        folders.sort();
        folders
    }

    pub fn folder_id(&self, kind: FolderKind, path: &[&str]) -> Option<String> {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.folders.get(&(kind, path)).map(|id| id.clone())
    }

    /// Uploaded image paths, sorted.
    pub fn images(&self) -> Vec<String> {
        let mut images: Vec<String> = self.images.iter().map(|e| e.key().clone()).collect();
        images.sort();
        images
    }

    pub fn embedded_items(&self, actor_id: &str) -> Vec<ItemPayload> {
        self.embedded
            .get(actor_id)
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    async fn create_item(&self, payload: &ItemPayload) -> PlatformResult<String> {
        let id = new_id();
        self.items.insert(id.clone(), payload.clone());
        Ok(id)
    }

    async fn create_actor(&self, payload: &ActorPayload) -> PlatformResult<String> {
        let id = new_id();
        self.actors.insert(id.clone(), payload.clone());
        Ok(id)
    }

    async fn find_or_create_folder(
        &self,
        path: &[String],
        kind: FolderKind,
    ) -> PlatformResult<String> {
        let mut id = String::new();
        for depth in 1..=path.len() {
            id = self
                .folders
                .entry((kind, path[..depth].to_vec()))
                .or_insert_with(new_id)
                .clone();
        }
        Ok(id)
    }

    async fn upload_image(
        &self,
        bytes: &[u8],
        file_name: &str,
        destination: &str,
    ) -> PlatformResult<String> {
        let path = format!("{destination}/{file_name}");
        self.images.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn create_embedded_items(
        &self,
        actor_id: &str,
        items: &[ItemPayload],
    ) -> PlatformResult<()> {
        if !self.actors.contains_key(actor_id) {
            return Err(PlatformError::ActorNotFound(actor_id.to_string()));
        }
        self.embedded
            .entry(actor_id.to_string())
            .or_default()
            .extend(items.iter().cloned());
        Ok(())
    }

    async fn find_item_by_name(&self, name: &str) -> PlatformResult<Option<ItemPayload>> {
        let name = name.to_lowercase();
        Ok(self
            .items
            .iter()
            .find(|e| e.value().name.to_lowercase() == name)
            .map(|e| e.value().clone()))
    }
}
