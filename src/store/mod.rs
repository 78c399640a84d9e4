use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemId};

/// Storage behind the item API. Every operation is a full read-modify-write
/// of the collection; nothing is cached between calls, so concurrent callers
/// race and the last write wins.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Read the full collection. An absent data file is an empty collection.
    async fn load(&self) -> AppResult<Vec<Item>>;

    /// Overwrite the full collection.
    async fn save(&self, items: &[Item]) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<Item>> {
        self.load().await
    }

    /// First item with `id`. Ids are not unique; later duplicates are shadowed.
    async fn get(&self, id: ItemId) -> AppResult<Item> {
        self.load()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(AppError::item_not_found)
    }

    /// Append the item and persist. No id uniqueness check.
    async fn put(&self, item: Item) -> AppResult<Item> {
        let mut items = self.load().await?;
        items.push(item.clone());
        self.save(&items).await?;
        Ok(item)
    }

    /// Remove every item with `id` and persist.
    async fn delete(&self, id: ItemId) -> AppResult<()> {
        let mut items = self.load().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(AppError::item_not_found());
        }
        self.save(&items).await
    }
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// The whole collection as one pretty-printed JSON array in one file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ItemStore for FileStore {
    async fn load(&self) -> AppResult<Vec<Item>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(AppError::Storage(format!(
                    "read {}: {err}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_slice(&bytes).map_err(|err| {
            AppError::Storage(format!("parse {}: {err}", self.path.display()))
        })
    }

    async fn save(&self, items: &[Item]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(items)
            .map_err(|err| AppError::Storage(format!("serialize collection: {err}")))?;

        fs::write(&self.path, json).await.map_err(|err| {
            AppError::Storage(format!("write {}: {err}", self.path.display()))
        })
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Test double holding the collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn load(&self) -> AppResult<Vec<Item>> {
        let items = self
            .items
            .lock()
            .map_err(|_| AppError::Storage("memory store poisoned".to_string()))?;
        Ok(items.clone())
    }

    async fn save(&self, items: &[Item]) -> AppResult<()> {
        let mut guard = self
            .items
            .lock()
            .map_err(|_| AppError::Storage("memory store poisoned".to_string()))?;
        *guard = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn item(id: ItemId, name: &str) -> Item {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), json!(name));
        Item { id, fields }
    }

    fn file_store(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(dir.path().join("items.json"))
    }

    // ── FileStore ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn load_absent_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        assert_eq!(store.load().await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let items = vec![item(1, "Widget"), item(2, "Bolt")];
        store.save(&items).await.unwrap();
        assert_eq!(store.load().await.unwrap(), items);
    }

    #[tokio::test]
    async fn save_writes_pretty_printed_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        store.save(&[item(1, "Widget")]).await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join("items.json")).unwrap();
        assert!(raw.contains('\n'), "expected multi-line output, got {raw:?}");
        assert!(raw.starts_with('['));
    }

    #[tokio::test]
    async fn load_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("items.json"), "{not json").unwrap();

        let store = file_store(&dir);
        assert!(matches!(store.load().await, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn put_appends_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        store.put(item(2, "second")).await.unwrap();
        store.put(item(1, "first-by-id-but-later")).await.unwrap();

        let ids: Vec<ItemId> = store.list().await.unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn delete_missing_id_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        store.save(&[item(1, "Widget")]).await.unwrap();

        let err = store.delete(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    // ── Id collisions (current behavior, deliberately untouched) ───────────────

    #[tokio::test]
    async fn put_tolerates_colliding_ids() {
        let store = MemoryStore::new();
        store.put(item(5, "first")).await.unwrap();
        store.put(item(5, "second")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_returns_first_of_colliding_ids() {
        let store = MemoryStore::with_items(vec![item(5, "first"), item(5, "second")]);
        let found = store.get(5).await.unwrap();
        assert_eq!(found.fields["name"], json!("first"));
    }

    #[tokio::test]
    async fn delete_removes_every_colliding_id() {
        let store =
            MemoryStore::with_items(vec![item(5, "first"), item(7, "keep"), item(5, "second")]);
        store.delete(5).await.unwrap();

        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 7);
    }

    #[tokio::test]
    async fn get_missing_id_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(1).await, Err(AppError::NotFound(_))));
    }
}
