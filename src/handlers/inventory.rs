//! Inventory CRUD handlers. Every successful mutation fires a best-effort
//! notification describing the change; a dropped notification never fails
//! or rolls back the mutation.

use crate::error::AppError;
use crate::models::{
    BulkDeleteRequest, InventoryPatch, InventoryRequest, NewInventoryItem, NewNotification,
    NotificationKind,
};
use crate::response;
use crate::session::CurrentUser;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;

fn parse_id(id: &str) -> Result<i32, AppError> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid item id".into()))
}

fn require(field: Option<String>, name: &str) -> Result<String, AppError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

/// Empty strings on optional reference fields mean "no reference".
/// On update this makes `""` indistinguishable from an omitted field,
/// so a set reference cannot be cleared through a merge patch.
fn optional(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

fn ensure_non_negative(name: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if v < 0.0 => Err(AppError::Validation(format!("{} must not be negative", name))),
        _ => Ok(()),
    }
}

fn validate_amounts(req: &InventoryRequest) -> Result<(), AppError> {
    ensure_non_negative("buyPrice", req.buy_price)?;
    ensure_non_negative("sellPrice", req.sell_price)?;
    ensure_non_negative("totalQuantity", req.total_quantity.map(f64::from))?;
    ensure_non_negative("minQuantity", req.min_quantity.map(f64::from))?;
    Ok(())
}

fn new_item_from_request(req: InventoryRequest) -> Result<NewInventoryItem, AppError> {
    validate_amounts(&req)?;
    Ok(NewInventoryItem {
        item_code: require(req.item_code, "itemCode")?,
        product_name: require(req.product_name, "productName")?,
        unit_of_measure: require(req.unit_of_measure, "unitOfMeasure")?,
        buy_price: req
            .buy_price
            .ok_or_else(|| AppError::Validation("buyPrice is required".into()))?,
        sell_price: req.sell_price,
        location: optional(req.location),
        category_id: optional(req.category_id),
        status: req.status.unwrap_or_default(),
        warehouse_id: optional(req.warehouse_id),
        total_quantity: req.total_quantity.unwrap_or(0),
        min_quantity: req.min_quantity.unwrap_or(0),
    })
}

fn patch_from_request(req: InventoryRequest) -> Result<InventoryPatch, AppError> {
    validate_amounts(&req)?;
    Ok(InventoryPatch {
        item_code: optional(req.item_code),
        product_name: optional(req.product_name),
        unit_of_measure: optional(req.unit_of_measure),
        buy_price: req.buy_price,
        sell_price: req.sell_price,
        location: optional(req.location),
        category_id: optional(req.category_id),
        status: req.status,
        warehouse_id: optional(req.warehouse_id),
        total_quantity: req.total_quantity,
        min_quantity: req.min_quantity,
    })
}

/// Fire-and-forget mutation notification. Not transactional with the
/// mutation: a failure is logged by the store and ignored here.
fn notify(state: &AppState, user_id: i32, title: &str, message: String, kind: NotificationKind) {
    let store = state.store.clone();
    let new = NewNotification {
        title: title.to_string(),
        message,
        kind,
        user_id: Some(user_id),
    };
    tokio::spawn(async move {
        if store.create_notification(new).await.is_none() {
            tracing::warn!("post-mutation notification dropped");
        }
    });
}

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    response::data(state.store.list_inventory().await)
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let item = state
        .store
        .get_inventory(id)
        .await
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(response::data(item))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<InventoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = new_item_from_request(body)?;
    let item = state
        .store
        .create_inventory(fields)
        .await
        .ok_or_else(|| AppError::Failed("Failed to create item".into()))?;
    notify(
        &state,
        user.id,
        "New Item Added",
        format!("{} has been added to inventory", item.product_name),
        NotificationKind::Info,
    );
    Ok(response::created(item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<InventoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let patch = patch_from_request(body)?;
    let item = state
        .store
        .update_inventory(id, patch)
        .await
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    notify(
        &state,
        user.id,
        "Item Updated",
        format!("{} details have been updated", item.product_name),
        NotificationKind::Info,
    );
    Ok(response::data(item))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !state.store.delete_inventory(id).await {
        return Err(AppError::NotFound("Item not found".into()));
    }
    notify(
        &state,
        user.id,
        "Item Deleted",
        "Inventory item has been removed".into(),
        NotificationKind::Warning,
    );
    Ok(response::message("Item deleted successfully"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: usize,
}

pub async fn delete_many(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<BulkDeleteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut deleted_count = 0;
    for id in body.ids {
        if state.store.delete_inventory(id).await {
            deleted_count += 1;
        }
    }
    if deleted_count > 0 {
        notify(
            &state,
            user.id,
            "Items Deleted",
            format!("{} inventory items have been removed", deleted_count),
            NotificationKind::Warning,
        );
    }
    Ok(Json(BulkDeleteResponse {
        success: true,
        message: format!("{} items deleted successfully", deleted_count),
        deleted_count,
    }))
}
