use std::path::Path;
use std::sync::Arc;

use crate::store::{ItemRepository, JsonFileItemRepository};

/// Shared handler state: the item store every route reads from.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ItemRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    /// State backed by the JSON array at `path`; the file is created on the
    /// first write.
    pub fn with_json_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Arc::new(JsonFileItemRepository::new(path)))
    }
}
