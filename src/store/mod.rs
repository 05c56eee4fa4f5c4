//! Dual-mode data access: `PgStore` against PostgreSQL, `MemStore` for demo
//! mode. The two implementations must be indistinguishable from the router's
//! side. Every operation absorbs internal faults (logging them) and reports
//! failure through its return value; nothing propagates an error upward.

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use crate::models::{
    AuthUser, Category, DbStatus, InventoryItem, InventoryPatch, Message, NewInventoryItem,
    NewMessage, NewNotification, Notification, Warehouse,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum entries returned by the notification and message feeds.
pub const FEED_LIMIT: usize = 10;

#[async_trait]
pub trait Store: Send + Sync {
    /// All inventory, enriched with category/warehouse display names,
    /// most-recently-updated first. Empty on backend fault.
    async fn list_inventory(&self) -> Vec<InventoryItem>;

    async fn get_inventory(&self, id: i32) -> Option<InventoryItem>;

    /// Assigns a fresh id and stamps both timestamps. `None` on fault
    /// (including constraint violations such as a duplicate item code).
    async fn create_inventory(&self, fields: NewInventoryItem) -> Option<InventoryItem>;

    /// Merge semantics: absent patch fields keep the stored value.
    /// Refreshes `updated_at`. `None` when the id does not exist.
    async fn update_inventory(&self, id: i32, patch: InventoryPatch) -> Option<InventoryItem>;

    /// Whether a row was actually removed.
    async fn delete_inventory(&self, id: i32) -> bool;

    /// Notifications owned by `user_id` or broadcast (null owner),
    /// newest-first, at most [`FEED_LIMIT`].
    async fn list_notifications(&self, user_id: i32) -> Vec<Notification>;

    async fn create_notification(&self, new: NewNotification) -> Option<Notification>;

    /// Marks every notification visible to `user_id` as read.
    async fn mark_all_notifications_read(&self, user_id: i32) -> bool;

    /// Messages owned by `user_id` or broadcast, newest-first, at most
    /// [`FEED_LIMIT`].
    async fn list_messages(&self, user_id: i32) -> Vec<Message>;

    async fn create_message(&self, new: NewMessage) -> Option<Message>;

    /// Seeded set, alphabetical by name.
    async fn list_categories(&self) -> Vec<Category>;

    /// Seeded set, alphabetical by name.
    async fn list_warehouses(&self) -> Vec<Warehouse>;

    /// Identity on a username/password match, `None` otherwise.
    async fn authenticate(&self, username: &str, password: &str) -> Option<AuthUser>;

    /// Connectivity probe for the status endpoint.
    async fn status(&self) -> DbStatus;
}

pub type SharedStore = Arc<dyn Store>;
