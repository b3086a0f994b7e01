//! Reconciles a Steam wishlist against a Notion database and announces price drops on Discord.
mod app;
mod config;
mod error;
mod reconcile;
mod service;

pub use app::run_and_report;
pub use config::AppConfig;
pub use error::Error;
pub use reconcile::{
    index_rows, LowestPrice, Plan, Reconciler, Summary, NOTION_RATE_PER_SECOND,
    STEAM_RATE_PER_SECOND,
};
pub use service::{DigestNotifier, ErrorReporter, WishlistRepository, WishlistSource};

pub type Result<T> = std::result::Result<T, Error>;
