//! Notification and message feed handlers.

use crate::error::AppError;
use crate::models::{MessageRequest, NewMessage, NewNotification, NotificationRequest};
use crate::response;
use crate::session::CurrentUser;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Extension, Json};

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    response::data(state.store.list_notifications(user.id).await)
}

pub async fn create_notification(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<NotificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = body
        .title
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("title is required".into()))?;
    let message = body
        .message
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("message is required".into()))?;
    let notification = state
        .store
        .create_notification(NewNotification {
            title,
            message,
            kind: body.kind.unwrap_or_default(),
            user_id: Some(user.id),
        })
        .await
        .ok_or_else(|| AppError::Failed("Failed to create notification".into()))?;
    Ok(response::created(notification))
}

pub async fn mark_notifications_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.mark_all_notifications_read(user.id).await {
        return Err(AppError::Internal);
    }
    Ok(response::message("Notifications marked as read"))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    response::data(state.store.list_messages(user.id).await)
}

pub async fn create_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<MessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sender_name = body
        .sender_name
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("senderName is required".into()))?;
    let message_text = body
        .message_text
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("messageText is required".into()))?;
    let message = state
        .store
        .create_message(NewMessage {
            sender_name,
            message_text,
            user_id: Some(user.id),
        })
        .await
        .ok_or_else(|| AppError::Failed("Failed to create message".into()))?;
    Ok(response::created(message))
}
