//! Read-only lookups: categories, warehouses, and the database status probe.

use crate::response;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::{json, Map, Value};

pub async fn categories(State(state): State<AppState>) -> impl IntoResponse {
    response::data(state.store.list_categories().await)
}

pub async fn warehouses(State(state): State<AppState>) -> impl IntoResponse {
    response::data(state.store.list_warehouses().await)
}

/// Unauthenticated connectivity probe.
pub async fn db_status(State(state): State<AppState>) -> Json<Value> {
    let status = state.store.status().await;
    let mut body = Map::new();
    body.insert("connected".into(), json!(status.connected));
    if let Some(database) = status.database {
        body.insert("database".into(), json!(database));
    }
    if let Some(error) = status.error {
        body.insert("error".into(), json!(error));
    }
    body.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
    Json(Value::Object(body))
}
