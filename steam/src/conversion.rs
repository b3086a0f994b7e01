use crate::{Error, Result};

/// Drops the two implicit fraction digits of a Steam price, e.g. `"100000"` -> `1000`.
pub fn normalize_price(raw: &str) -> Result<u64> {
    let value: i64 = raw.parse().map_err(|_| Error::Price(raw.to_string()))?;
    u64::try_from(value)
        .map(|value| value / 100)
        .map_err(|_| Error::Price(raw.to_string()))
}
