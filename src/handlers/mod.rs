//! Request handlers, grouped by concern.

pub mod auth;
pub mod feeds;
pub mod inventory;
pub mod lookup;
