//! PostgreSQL store. Schema is ensured with idempotent DDL at startup and
//! reference tables are seeded only when empty. Per the store contract,
//! request-path operations log failures and return sentinel values instead
//! of propagating errors.

use crate::models::{
    AuthUser, Category, DbStatus, InventoryItem, InventoryPatch, ItemStatus, Message,
    NewInventoryItem, NewMessage, NewNotification, Notification, NotificationKind, Role,
    Warehouse,
};
use crate::store::{Store, FEED_LIMIT};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("password hash: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

pub struct PgStore {
    pool: PgPool,
}

const SCHEMA_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(50) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        role VARCHAR(20) DEFAULT 'user',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id VARCHAR(10) PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS warehouses (
        id VARCHAR(10) PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        location VARCHAR(255),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        id SERIAL PRIMARY KEY,
        item_code VARCHAR(20) UNIQUE NOT NULL,
        product_name VARCHAR(255) NOT NULL,
        unit_of_measure VARCHAR(10) NOT NULL,
        buy_price DOUBLE PRECISION NOT NULL,
        sell_price DOUBLE PRECISION,
        location VARCHAR(255),
        category_id VARCHAR(10) REFERENCES categories(id),
        status VARCHAR(20) NOT NULL DEFAULT 'active',
        warehouse_id VARCHAR(10) REFERENCES warehouses(id),
        total_quantity INTEGER NOT NULL DEFAULT 0,
        min_quantity INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id SERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        message TEXT NOT NULL,
        type VARCHAR(20) NOT NULL DEFAULT 'info',
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        user_id INTEGER REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        sender_name VARCHAR(100) NOT NULL,
        message_text TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        user_id INTEGER REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Ensure all tables exist, create the default admin user when missing,
    /// and seed categories/warehouses when their tables are empty.
    pub async fn init(&self) -> Result<(), InitError> {
        for ddl in SCHEMA_DDL {
            sqlx::query(ddl).execute(&self.pool).await?;
        }

        let admin: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = 'admin'")
                .fetch_optional(&self.pool)
                .await?;
        if admin.is_none() {
            let hashed = bcrypt::hash("admin", bcrypt::DEFAULT_COST)?;
            sqlx::query("INSERT INTO users (username, password, role) VALUES ('admin', $1, 'admin')")
                .bind(&hashed)
                .execute(&self.pool)
                .await?;
            tracing::info!("default admin user created");
        }

        let (categories,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        if categories == 0 {
            sqlx::query(
                r#"
                INSERT INTO categories (id, name, description) VALUES
                ('CAT001', 'Electronics', 'Electronic devices and components'),
                ('CAT002', 'Accessories', 'Various accessories and peripherals'),
                ('CAT003', 'Components', 'Hardware components and parts')
                "#,
            )
            .execute(&self.pool)
            .await?;
            tracing::info!("sample categories inserted");
        }

        let (warehouses,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await?;
        if warehouses == 0 {
            sqlx::query(
                r#"
                INSERT INTO warehouses (id, name, location) VALUES
                ('WH001', 'Main Warehouse', 'Manila, Philippines'),
                ('WH002', 'Secondary Warehouse', 'Cebu, Philippines')
                "#,
            )
            .execute(&self.pool)
            .await?;
            tracing::info!("sample warehouses inserted");
        }

        Ok(())
    }
}

fn item_from_row(row: &PgRow) -> Result<InventoryItem, sqlx::Error> {
    Ok(InventoryItem {
        id: row.try_get("id")?,
        item_code: row.try_get("item_code")?,
        product_name: row.try_get("product_name")?,
        unit_of_measure: row.try_get("unit_of_measure")?,
        buy_price: row.try_get("buy_price")?,
        sell_price: row.try_get("sell_price")?,
        location: row.try_get("location")?,
        category_id: row.try_get("category_id")?,
        status: ItemStatus::parse(row.try_get::<String, _>("status")?.as_str()),
        warehouse_id: row.try_get("warehouse_id")?,
        total_quantity: row.try_get("total_quantity")?,
        min_quantity: row.try_get("min_quantity")?,
        // Display names only exist on the joined list query.
        category_name: row.try_get("category_name").unwrap_or(None),
        warehouse_name: row.try_get("warehouse_name").unwrap_or(None),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn notification_from_row(row: &PgRow) -> Result<Notification, sqlx::Error> {
    Ok(Notification {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        kind: NotificationKind::parse(row.try_get::<String, _>("type")?.as_str()),
        is_read: row.try_get("is_read")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn message_from_row(row: &PgRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        sender_name: row.try_get("sender_name")?,
        message_text: row.try_get("message_text")?,
        is_read: row.try_get("is_read")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn list_inventory(&self) -> Vec<InventoryItem> {
        let result = sqlx::query(
            r#"
            SELECT i.*, c.name AS category_name, w.name AS warehouse_name
            FROM inventory i
            LEFT JOIN categories c ON i.category_id = c.id
            LEFT JOIN warehouses w ON i.warehouse_id = w.id
            ORDER BY i.updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .and_then(|rows| rows.iter().map(item_from_row).collect());
        match result {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "failed to list inventory");
                Vec::new()
            }
        }
    }

    async fn get_inventory(&self, id: i32) -> Option<InventoryItem> {
        let row = sqlx::query("SELECT * FROM inventory WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        match row {
            Ok(row) => row.and_then(|r| item_from_row(&r).ok()),
            Err(e) => {
                tracing::error!(error = %e, id, "failed to fetch inventory item");
                None
            }
        }
    }

    async fn create_inventory(&self, fields: NewInventoryItem) -> Option<InventoryItem> {
        let result = sqlx::query(
            r#"
            INSERT INTO inventory (
                item_code, product_name, unit_of_measure, buy_price, sell_price,
                location, category_id, status, warehouse_id, total_quantity, min_quantity
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&fields.item_code)
        .bind(&fields.product_name)
        .bind(&fields.unit_of_measure)
        .bind(fields.buy_price)
        .bind(fields.sell_price)
        .bind(&fields.location)
        .bind(&fields.category_id)
        .bind(fields.status.as_str())
        .bind(&fields.warehouse_id)
        .bind(fields.total_quantity)
        .bind(fields.min_quantity)
        .fetch_one(&self.pool)
        .await
        .and_then(|r| item_from_row(&r));
        match result {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::error!(error = %e, "failed to create inventory item");
                None
            }
        }
    }

    async fn update_inventory(&self, id: i32, patch: InventoryPatch) -> Option<InventoryItem> {
        // COALESCE keeps the stored value for every absent patch field.
        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                item_code = COALESCE($2, item_code),
                product_name = COALESCE($3, product_name),
                unit_of_measure = COALESCE($4, unit_of_measure),
                buy_price = COALESCE($5, buy_price),
                sell_price = COALESCE($6, sell_price),
                location = COALESCE($7, location),
                category_id = COALESCE($8, category_id),
                status = COALESCE($9, status),
                warehouse_id = COALESCE($10, warehouse_id),
                total_quantity = COALESCE($11, total_quantity),
                min_quantity = COALESCE($12, min_quantity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.item_code)
        .bind(&patch.product_name)
        .bind(&patch.unit_of_measure)
        .bind(patch.buy_price)
        .bind(patch.sell_price)
        .bind(&patch.location)
        .bind(&patch.category_id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(&patch.warehouse_id)
        .bind(patch.total_quantity)
        .bind(patch.min_quantity)
        .fetch_optional(&self.pool)
        .await;
        match result {
            Ok(row) => row.and_then(|r| item_from_row(&r).ok()),
            Err(e) => {
                tracing::error!(error = %e, id, "failed to update inventory item");
                None
            }
        }
    }

    async fn delete_inventory(&self, id: i32) -> bool {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        match result {
            Ok(row) => row.is_some(),
            Err(e) => {
                tracing::error!(error = %e, id, "failed to delete inventory item");
                false
            }
        }
    }

    async fn list_notifications(&self, user_id: i32) -> Vec<Notification> {
        let result = sqlx::query(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(FEED_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .and_then(|rows| rows.iter().map(notification_from_row).collect());
        match result {
            Ok(notifications) => notifications,
            Err(e) => {
                tracing::error!(error = %e, "failed to list notifications");
                Vec::new()
            }
        }
    }

    async fn create_notification(&self, new: NewNotification) -> Option<Notification> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (title, message, type, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.kind.as_str())
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .and_then(|r| notification_from_row(&r));
        match result {
            Ok(notification) => Some(notification),
            Err(e) => {
                tracing::error!(error = %e, "failed to create notification");
                None
            }
        }
    }

    async fn mark_all_notifications_read(&self, user_id: i32) -> bool {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 OR user_id IS NULL")
                .bind(user_id)
                .execute(&self.pool)
                .await;
        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to mark notifications read");
                false
            }
        }
    }

    async fn list_messages(&self, user_id: i32) -> Vec<Message> {
        let result = sqlx::query(
            r#"
            SELECT * FROM messages
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(FEED_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .and_then(|rows| rows.iter().map(message_from_row).collect());
        match result {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(error = %e, "failed to list messages");
                Vec::new()
            }
        }
    }

    async fn create_message(&self, new: NewMessage) -> Option<Message> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender_name, message_text, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&new.sender_name)
        .bind(&new.message_text)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .and_then(|r| message_from_row(&r));
        match result {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::error!(error = %e, "failed to create message");
                None
            }
        }
    }

    async fn list_categories(&self) -> Vec<Category> {
        let result = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await;
        match result {
            Ok(rows) => rows
                .iter()
                .filter_map(|r| {
                    Some(Category {
                        id: r.try_get("id").ok()?,
                        name: r.try_get("name").ok()?,
                        description: r.try_get("description").ok()?,
                    })
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to list categories");
                Vec::new()
            }
        }
    }

    async fn list_warehouses(&self) -> Vec<Warehouse> {
        let result = sqlx::query("SELECT * FROM warehouses ORDER BY name")
            .fetch_all(&self.pool)
            .await;
        match result {
            Ok(rows) => rows
                .iter()
                .filter_map(|r| {
                    Some(Warehouse {
                        id: r.try_get("id").ok()?,
                        name: r.try_get("name").ok()?,
                        location: r.try_get("location").ok()?,
                    })
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to list warehouses");
                Vec::new()
            }
        }
    }

    async fn authenticate(&self, username: &str, password: &str) -> Option<AuthUser> {
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await;
        let row = match row {
            Ok(row) => row?,
            Err(e) => {
                tracing::error!(error = %e, "authentication lookup failed");
                return None;
            }
        };
        let stored_hash: String = row.try_get("password").ok()?;
        match bcrypt::verify(password, &stored_hash) {
            Ok(true) => Some(AuthUser {
                id: row.try_get("id").ok()?,
                username: row.try_get("username").ok()?,
                role: Role::parse(row.try_get::<String, _>("role").ok()?.as_str()),
            }),
            Ok(false) => None,
            Err(e) => {
                tracing::error!(error = %e, "password verification failed");
                None
            }
        }
    }

    async fn status(&self) -> DbStatus {
        let result: Result<(String,), sqlx::Error> =
            sqlx::query_as("SELECT current_database()")
                .fetch_one(&self.pool)
                .await;
        match result {
            Ok((database,)) => DbStatus {
                connected: true,
                database: Some(database),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "database status check failed");
                DbStatus {
                    connected: false,
                    database: None,
                    error: Some("Connection failed".into()),
                }
            }
        }
    }
}
