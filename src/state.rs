//! Shared application state for all routes.

use crate::session::SessionStore;
use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    /// Persistent or in-memory store, chosen once at startup.
    pub store: SharedStore,
    pub sessions: SessionStore,
}
