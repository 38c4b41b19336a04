//! File-backed item storage.
//!
//! The whole collection lives in a single JSON array. Every operation reloads
//! the file from disk and every mutation rewrites it in full; there is no
//! cache and no index. Writers are serialized through one lock, readers never
//! take it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::{Item, ItemDraft, PageRequest};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(i64),

    #[error("I/O error on data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is not a valid item array: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no id left after {0}")]
    IdSpaceExhausted(i64),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn read_all(&self) -> StoreResult<Vec<Item>>;
    async fn create(&self, draft: ItemDraft) -> StoreResult<Item>;
    async fn update(&self, id: i64, draft: ItemDraft) -> StoreResult<Item>;
    async fn delete(&self, id: i64) -> StoreResult<()>;
    async fn get_by_id(&self, id: i64) -> StoreResult<Item>;
    async fn list(&self, page: PageRequest) -> StoreResult<Vec<Item>>;
}

pub struct JsonFileItemRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileItemRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Vec<Item>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let items: Vec<Item> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = items.len(), "loaded items");
        Ok(items)
    }

    /// Overwrites the data file in place. A crash mid-write can leave it
    /// truncated.
    pub async fn write_all(&self, items: &[Item]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_vec_pretty(items)?;
        fs::write(&self.path, serialized).await?;
        debug!(path = %self.path.display(), count = items.len(), "wrote items");
        Ok(())
    }
}

fn next_id(items: &[Item]) -> StoreResult<i64> {
    match items.iter().map(|item| item.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(StoreError::IdSpaceExhausted(max)),
    }
}

#[async_trait]
impl ItemRepository for JsonFileItemRepository {
    async fn read_all(&self) -> StoreResult<Vec<Item>> {
        self.load().await
    }

    async fn create(&self, draft: ItemDraft) -> StoreResult<Item> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.load().await?;
        let created = draft.into_item(next_id(&items)?);
        items.push(created.clone());
        self.write_all(&items).await?;

        info!(id = created.id, "item created");
        Ok(created)
    }

    async fn update(&self, id: i64, draft: ItemDraft) -> StoreResult<Item> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.load().await?;
        let Some(slot) = items.iter_mut().find(|item| item.id == id) else {
            return Err(StoreError::NotFound(id));
        };

        *slot = draft.into_item(id);
        let updated = slot.clone();
        self.write_all(&items).await?;

        info!(id, "item updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut items = self.load().await?;
        let Some(index) = items.iter().position(|item| item.id == id) else {
            return Err(StoreError::NotFound(id));
        };

        items.remove(index);
        self.write_all(&items).await?;

        info!(id, "item deleted");
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Item> {
        self.load()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, page: PageRequest) -> StoreResult<Vec<Item>> {
        let items = self.load().await?;
        Ok(items
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }
}
