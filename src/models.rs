//! Domain records and wire DTOs. Stored records serialize with snake_case
//! keys (matching the database columns); request bodies arrive camelCase and
//! are renamed at the serde boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
        }
    }

    /// Unknown values fall back to active (the database default).
    pub fn parse(s: &str) -> Self {
        match s {
            "inactive" => ItemStatus::Inactive,
            _ => ItemStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "warning" => NotificationKind::Warning,
            "error" => NotificationKind::Error,
            _ => NotificationKind::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Authenticated identity held in the session. Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: i32,
    pub item_code: String,
    pub product_name: String,
    pub unit_of_measure: String,
    pub buy_price: f64,
    pub sell_price: Option<f64>,
    pub location: Option<String>,
    pub category_id: Option<String>,
    pub status: ItemStatus,
    pub warehouse_id: Option<String>,
    pub total_quantity: i32,
    pub min_quantity: i32,
    /// Display names resolved from the referenced category/warehouse; only
    /// present on list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully-resolved fields for an insert; defaults are applied by the router
/// before this struct is built.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub item_code: String,
    pub product_name: String,
    pub unit_of_measure: String,
    pub buy_price: f64,
    pub sell_price: Option<f64>,
    pub location: Option<String>,
    pub category_id: Option<String>,
    pub status: ItemStatus,
    pub warehouse_id: Option<String>,
    pub total_quantity: i32,
    pub min_quantity: i32,
}

/// Partial update. `None` keeps the stored value (merge semantics in both
/// store modes); nullable columns cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPatch {
    pub item_code: Option<String>,
    pub product_name: Option<String>,
    pub unit_of_measure: Option<String>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub location: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<ItemStatus>,
    pub warehouse_id: Option<String>,
    pub total_quantity: Option<i32>,
    pub min_quantity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    /// `None` is a broadcast, visible to every session.
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: i32,
    pub sender_name: String,
    pub message_text: String,
    pub is_read: bool,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender_name: String,
    pub message_text: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inventory create/update body. Every field is optional so the same shape
/// serves POST (router enforces required fields) and PUT (merge patch).
/// Price and quantity fields accept numbers or numeric strings; anything
/// else is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    pub item_code: Option<String>,
    pub product_name: Option<String>,
    pub unit_of_measure: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub buy_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sell_price: Option<f64>,
    pub location: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<ItemStatus>,
    pub warehouse_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub total_quantity: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub min_quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationKind>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub sender_name: Option<String>,
    pub message_text: Option<String>,
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Fractional inputs truncate toward zero, so `7.5` and `"7.5"` both
/// come through as `7`.
fn lenient_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64().and_then(truncate_i32),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(truncate_i32),
        _ => None,
    })
}

fn truncate_i32(v: f64) -> Option<i32> {
    let t = v.trunc();
    (t >= i32::MIN as f64 && t <= i32::MAX as f64).then(|| t as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_request_accepts_numeric_strings() {
        let req: InventoryRequest = serde_json::from_str(
            r#"{"itemCode":"ITM010","buyPrice":"250.50","totalQuantity":"15","minQuantity":5}"#,
        )
        .unwrap();
        assert_eq!(req.item_code.as_deref(), Some("ITM010"));
        assert_eq!(req.buy_price, Some(250.50));
        assert_eq!(req.total_quantity, Some(15));
        assert_eq!(req.min_quantity, Some(5));
    }

    #[test]
    fn inventory_request_truncates_fractional_quantities() {
        let req: InventoryRequest =
            serde_json::from_str(r#"{"totalQuantity":7.5,"minQuantity":"2.9"}"#).unwrap();
        assert_eq!(req.total_quantity, Some(7));
        assert_eq!(req.min_quantity, Some(2));
    }

    #[test]
    fn inventory_request_treats_garbage_numbers_as_absent() {
        let req: InventoryRequest =
            serde_json::from_str(r#"{"buyPrice":"abc","totalQuantity":null}"#).unwrap();
        assert_eq!(req.buy_price, None);
        assert_eq!(req.total_quantity, None);
    }

    #[test]
    fn notification_kind_serializes_as_type() {
        let n = Notification {
            id: 1,
            title: "t".into(),
            message: "m".into(),
            kind: NotificationKind::Warning,
            is_read: false,
            user_id: None,
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v["type"], "warning");
        assert!(v.get("kind").is_none());
    }
}
