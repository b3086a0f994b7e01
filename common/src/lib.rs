mod app_id;
mod env;
mod rate_limiter;
mod text;

pub use app_id::AppId;
pub use env::{require_vars, MissingVars};
pub use rate_limiter::{Cancelled, RateLimiter};
pub use text::{truncate, BODY_SNIPPET_CHARS};
pub use tokio_util::sync::CancellationToken;

use env_logger::{Builder, Env};

/// Loads `.env` if present and initialises the logger with a default filter of `info`.
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
