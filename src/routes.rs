//! Router composition: public routes plus the session-gated API surface.

use crate::handlers::{auth, feeds, inventory, lookup};
use crate::session;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/api/db-status", get(lookup::db_status));

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        .route(
            "/api/inventory",
            get(inventory::list)
                .post(inventory::create)
                .delete(inventory::delete_many),
        )
        .route(
            "/api/inventory/:id",
            get(inventory::read)
                .put(inventory::update)
                .delete(inventory::delete_one),
        )
        .route(
            "/api/notifications",
            get(feeds::list_notifications).post(feeds::create_notification),
        )
        .route(
            "/api/notifications/mark-read",
            put(feeds::mark_notifications_read),
        )
        .route(
            "/api/messages",
            get(feeds::list_messages).post(feeds::create_message),
        )
        .route("/api/categories", get(lookup::categories))
        .route("/api/warehouses", get(lookup::warehouses))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
