//! Environment configuration, read once at startup. `.env` files are
//! honored via dotenvy in `main`.

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// When absent the server runs in demo mode with the in-memory store.
    pub database_url: Option<String>,
    pub session_secret: String,
    pub port: u16,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let session_secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
            tracing::warn!("SESSION_SECRET not set, using a development default");
            "stockhub-dev-secret".into()
        });
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        Self {
            database_url,
            session_secret,
            port,
            session_ttl_hours,
        }
    }
}
