//! In-memory store for demo mode. State lives for the process lifetime and
//! is shared by all sessions; each instance is independently owned, so tests
//! construct isolated stores.

use crate::models::{
    AuthUser, Category, DbStatus, InventoryItem, InventoryPatch, ItemStatus, Message,
    NewInventoryItem, NewMessage, NewNotification, Notification, NotificationKind, Role,
    Warehouse,
};
use crate::store::{Store, FEED_LIMIT};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct MemStore {
    inner: Mutex<Inner>,
}

struct Inner {
    inventory: Vec<InventoryItem>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    categories: Vec<Category>,
    warehouses: Vec<Warehouse>,
    next_inventory_id: i32,
    next_notification_id: i32,
    next_message_id: i32,
}

impl MemStore {
    /// Empty store with only the category/warehouse reference data.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                inventory: Vec::new(),
                notifications: Vec::new(),
                messages: Vec::new(),
                categories: seed_categories(),
                warehouses: seed_warehouses(),
                next_inventory_id: 1,
                next_notification_id: 1,
                next_message_id: 1,
            }),
        }
    }

    /// Store pre-populated with the demo fixtures.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            inner.inventory = seed_inventory();
            inner.notifications = seed_notifications();
            inner.messages = seed_messages();
            inner.next_inventory_id = 3;
            inner.next_notification_id = 3;
            inner.next_message_id = 2;
        }
        store
    }

    /// Recovers from a poisoned lock: per the store contract nothing may
    /// panic through to the caller, and the data stays usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enrich(inner: &Inner, mut item: InventoryItem) -> InventoryItem {
        item.category_name = item.category_id.as_deref().and_then(|id| {
            inner
                .categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
        });
        item.warehouse_name = item.warehouse_id.as_deref().and_then(|id| {
            inner
                .warehouses
                .iter()
                .find(|w| w.id == id)
                .map(|w| w.name.clone())
        });
        item
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn list_inventory(&self) -> Vec<InventoryItem> {
        let inner = self.lock();
        let mut items: Vec<InventoryItem> = inner
            .inventory
            .iter()
            .map(|i| Self::enrich(&inner, i.clone()))
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        items
    }

    async fn get_inventory(&self, id: i32) -> Option<InventoryItem> {
        let inner = self.lock();
        inner.inventory.iter().find(|i| i.id == id).cloned()
    }

    async fn create_inventory(&self, fields: NewInventoryItem) -> Option<InventoryItem> {
        let mut inner = self.lock();
        let now = Utc::now();
        let item = InventoryItem {
            id: inner.next_inventory_id,
            item_code: fields.item_code,
            product_name: fields.product_name,
            unit_of_measure: fields.unit_of_measure,
            buy_price: fields.buy_price,
            sell_price: fields.sell_price,
            location: fields.location,
            category_id: fields.category_id,
            status: fields.status,
            warehouse_id: fields.warehouse_id,
            total_quantity: fields.total_quantity,
            min_quantity: fields.min_quantity,
            category_name: None,
            warehouse_name: None,
            created_at: now,
            updated_at: now,
        };
        inner.next_inventory_id += 1;
        inner.inventory.push(item.clone());
        Some(item)
    }

    async fn update_inventory(&self, id: i32, patch: InventoryPatch) -> Option<InventoryItem> {
        let mut inner = self.lock();
        let item = inner.inventory.iter_mut().find(|i| i.id == id)?;
        if let Some(v) = patch.item_code {
            item.item_code = v;
        }
        if let Some(v) = patch.product_name {
            item.product_name = v;
        }
        if let Some(v) = patch.unit_of_measure {
            item.unit_of_measure = v;
        }
        if let Some(v) = patch.buy_price {
            item.buy_price = v;
        }
        if let Some(v) = patch.sell_price {
            item.sell_price = Some(v);
        }
        if let Some(v) = patch.location {
            item.location = Some(v);
        }
        if let Some(v) = patch.category_id {
            item.category_id = Some(v);
        }
        if let Some(v) = patch.status {
            item.status = v;
        }
        if let Some(v) = patch.warehouse_id {
            item.warehouse_id = Some(v);
        }
        if let Some(v) = patch.total_quantity {
            item.total_quantity = v;
        }
        if let Some(v) = patch.min_quantity {
            item.min_quantity = v;
        }
        item.updated_at = Utc::now();
        Some(item.clone())
    }

    async fn delete_inventory(&self, id: i32) -> bool {
        let mut inner = self.lock();
        let before = inner.inventory.len();
        inner.inventory.retain(|i| i.id != id);
        inner.inventory.len() < before
    }

    async fn list_notifications(&self, user_id: i32) -> Vec<Notification> {
        let inner = self.lock();
        inner
            .notifications
            .iter()
            .filter(|n| n.user_id.is_none() || n.user_id == Some(user_id))
            .take(FEED_LIMIT)
            .cloned()
            .collect()
    }

    async fn create_notification(&self, new: NewNotification) -> Option<Notification> {
        let mut inner = self.lock();
        let notification = Notification {
            id: inner.next_notification_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            is_read: false,
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        inner.next_notification_id += 1;
        inner.notifications.insert(0, notification.clone());
        Some(notification)
    }

    async fn mark_all_notifications_read(&self, user_id: i32) -> bool {
        let mut inner = self.lock();
        for n in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id.is_none() || n.user_id == Some(user_id))
        {
            n.is_read = true;
        }
        true
    }

    async fn list_messages(&self, user_id: i32) -> Vec<Message> {
        let inner = self.lock();
        inner
            .messages
            .iter()
            .filter(|m| m.user_id.is_none() || m.user_id == Some(user_id))
            .take(FEED_LIMIT)
            .cloned()
            .collect()
    }

    async fn create_message(&self, new: NewMessage) -> Option<Message> {
        let mut inner = self.lock();
        let message = Message {
            id: inner.next_message_id,
            sender_name: new.sender_name,
            message_text: new.message_text,
            is_read: false,
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        inner.next_message_id += 1;
        inner.messages.insert(0, message.clone());
        Some(message)
    }

    async fn list_categories(&self) -> Vec<Category> {
        let inner = self.lock();
        let mut out = inner.categories.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    async fn list_warehouses(&self) -> Vec<Warehouse> {
        let inner = self.lock();
        let mut out = inner.warehouses.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    async fn authenticate(&self, username: &str, password: &str) -> Option<AuthUser> {
        // Demo mode accepts exactly these two pairs, both mapped to the
        // synthetic user id 1.
        match (username, password) {
            ("admin", "admin") => Some(AuthUser {
                id: 1,
                username: "admin".into(),
                role: Role::Admin,
            }),
            ("user", "user") => Some(AuthUser {
                id: 1,
                username: "user".into(),
                role: Role::User,
            }),
            _ => None,
        }
    }

    async fn status(&self) -> DbStatus {
        DbStatus {
            connected: false,
            database: None,
            error: Some("Demo mode - no database configured".into()),
        }
    }
}

fn seed_categories() -> Vec<Category> {
    vec![
        Category {
            id: "CAT001".into(),
            name: "Electronics".into(),
            description: Some("Electronic devices and components".into()),
        },
        Category {
            id: "CAT002".into(),
            name: "Accessories".into(),
            description: Some("Various accessories and peripherals".into()),
        },
        Category {
            id: "CAT003".into(),
            name: "Components".into(),
            description: Some("Hardware components and parts".into()),
        },
    ]
}

fn seed_warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse {
            id: "WH001".into(),
            name: "Main Warehouse".into(),
            location: Some("Manila, Philippines".into()),
        },
        Warehouse {
            id: "WH002".into(),
            name: "Secondary Warehouse".into(),
            location: Some("Cebu, Philippines".into()),
        },
    ]
}

fn seed_inventory() -> Vec<InventoryItem> {
    let day1 = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let day2 = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
    vec![
        InventoryItem {
            id: 1,
            item_code: "ITM001".into(),
            product_name: "Wireless Earphone".into(),
            unit_of_measure: "PCS".into(),
            buy_price: 250.00,
            sell_price: Some(350.00),
            location: Some("Philippines".into()),
            category_id: Some("CAT001".into()),
            status: ItemStatus::Active,
            warehouse_id: Some("WH001".into()),
            total_quantity: 15,
            min_quantity: 5,
            category_name: None,
            warehouse_name: None,
            created_at: day1,
            updated_at: day1,
        },
        InventoryItem {
            id: 2,
            item_code: "ITM002".into(),
            product_name: "USB Cable".into(),
            unit_of_measure: "PCS".into(),
            buy_price: 50.00,
            sell_price: Some(75.00),
            location: Some("Philippines".into()),
            category_id: Some("CAT002".into()),
            status: ItemStatus::Inactive,
            warehouse_id: Some("WH002".into()),
            total_quantity: 8,
            min_quantity: 10,
            category_name: None,
            warehouse_name: None,
            created_at: day2,
            updated_at: day2,
        },
    ]
}

fn seed_notifications() -> Vec<Notification> {
    let now = Utc::now();
    vec![
        Notification {
            id: 1,
            title: "Low Stock Alert".into(),
            message: "USB Cable quantity is below minimum threshold (8 remaining)".into(),
            kind: NotificationKind::Warning,
            is_read: false,
            user_id: Some(1),
            created_at: now - Duration::minutes(2),
        },
        Notification {
            id: 2,
            title: "Welcome!".into(),
            message: "Welcome to Stockhub! This is running in demo mode.".into(),
            kind: NotificationKind::Info,
            is_read: false,
            user_id: Some(1),
            created_at: now - Duration::hours(1),
        },
    ]
}

fn seed_messages() -> Vec<Message> {
    vec![Message {
        id: 1,
        sender_name: "System Admin".into(),
        message_text: "Demo mode is active. Connect a real database to persist data.".into(),
        is_read: false,
        user_id: Some(1),
        created_at: Utc::now() - Duration::minutes(5),
    }]
}
