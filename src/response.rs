//! Standard response envelope helpers: `{"success": true, ...}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct DataBody<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

pub fn data<T: Serialize>(data: T) -> Json<DataBody<T>> {
    Json(DataBody {
        success: true,
        data,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<DataBody<T>>) {
    (
        StatusCode::CREATED,
        Json(DataBody {
            success: true,
            data,
        }),
    )
}

pub fn message(message: impl Into<String>) -> Json<MessageBody> {
    Json(MessageBody {
        success: true,
        message: message.into(),
    })
}
