//! Client for the Steam Store endpoints the price notifier reads from:
//! a user's wishlist and per-app store details.
mod client;
mod conversion;
mod date;
mod endpoint;
mod error;

pub use client::{Client, Config, GameDetails, WishlistEntry, API_URL, STORE_URL};
pub use conversion::normalize_price;
pub use date::{normalize_release_date, TO_BE_ANNOUNCED};
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
