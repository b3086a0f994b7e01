use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Steam's numeric identifier for a game. Join key between Steam and Notion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    FromStr,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct AppId(pub u64);
