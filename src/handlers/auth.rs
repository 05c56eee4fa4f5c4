//! Login, logout, and current-user handlers.

use crate::error::AppError;
use crate::models::LoginRequest;
use crate::response;
use crate::session::{session_cookie, CurrentUser, SESSION_COOKIE};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Extension, Json,
};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .authenticate(&body.username, &body.password)
        .await
        .ok_or(AppError::InvalidCredentials)?;
    tracing::info!(username = %user.username, "login");
    let cookie = state.sessions.issue(user);
    let header_value = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        cookie,
        state.sessions.ttl_seconds()
    );
    Ok((
        [(header::SET_COOKIE, header_value)],
        response::message("Login successful"),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = session_cookie(&headers) {
        state.sessions.revoke(&cookie);
    }
    // Expire the cookie client-side as well.
    let clear = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    Ok((
        [(header::SET_COOKIE, clear)],
        response::message("Logout successful"),
    ))
}

pub async fn current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "username": user.username,
        "role": user.role,
    }))
}
