//! Stockhub: session-based inventory management backend with a dual-mode
//! (PostgreSQL / in-memory demo) store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::app;
pub use session::SessionStore;
pub use state::AppState;
pub use store::{MemStore, PgStore, SharedStore, Store};
