//! Discord webhook delivery: the price-drop digest and the error side channel.
mod client;
mod digest;
mod error;

pub use client::{Client, Config, BASE_URL, MAX_CONTENT_CHARS, RATE_PER_SECOND};
pub use digest::{render_messages, Digest, DigestEntry, HEADER, LINES_PER_MESSAGE};
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
