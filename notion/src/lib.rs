//! Client for the Notion database that stores the wishlist and each game's lowest price.
mod client;
mod error;
mod schema;

pub use client::{Client, Config, BASE_URL, NOTION_VERSION};
pub use error::Error;
pub use schema::{Properties, Row};

pub type Result<T> = std::result::Result<T, Error>;
