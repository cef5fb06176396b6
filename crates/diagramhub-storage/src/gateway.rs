//! Remote item gateway trait.

use async_trait::async_trait;

use diagramhub_core::{AppResult, ItemId};
use diagramhub_entity::content::{FileContent, FileVersion};
use diagramhub_entity::item::{CreateItem, Item, MoveItem, RenameItem, SaveContent};

/// Request/response contract of the item persistence layer.
///
/// Every call is scoped to one owner. Ids the owner does not hold are
/// reported as `NotFound`, the same as ids that do not exist.
#[async_trait]
pub trait ItemGateway: Send + Sync + std::fmt::Debug + 'static {
    /// All items of the owner, folders first, then by name.
    async fn list_items(&self) -> AppResult<Vec<Item>>;

    /// Create an item. File names get the workspace extension.
    async fn create_item(&self, input: CreateItem) -> AppResult<Item>;

    /// Rename an item. The extension is re-enforced for files.
    async fn rename_item(&self, id: &ItemId, input: RenameItem) -> AppResult<()>;

    /// Reparent an item.
    async fn move_item(&self, id: &ItemId, input: MoveItem) -> AppResult<()>;

    /// Delete an item with its whole subtree and their content.
    async fn delete_item(&self, id: &ItemId) -> AppResult<()>;

    /// Copy a file next to itself under a non-colliding name.
    async fn duplicate_item(&self, id: &ItemId) -> AppResult<Item>;

    /// Current content of a file.
    async fn get_content(&self, id: &ItemId) -> AppResult<FileContent>;

    /// Replace the content of a file, snapshotting non-empty prior content.
    async fn save_content(&self, id: &ItemId, input: SaveContent) -> AppResult<()>;

    /// Version history of a file, newest first.
    async fn list_versions(&self, id: &ItemId) -> AppResult<Vec<FileVersion>>;
}
