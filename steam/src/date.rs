use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

pub const TO_BE_ANNOUNCED: &str = "To be announced";

const RELEASE_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none] [month repr:short], [year]");

/// Parses Steam's `"2 Jan, 2006"` style release dates.
///
/// Anything else ("To be announced", "Q3 2025", a bare year) is unknown rather than an error.
pub fn normalize_release_date(raw: &str) -> Option<Date> {
    if raw == TO_BE_ANNOUNCED {
        log::debug!("Release date not announced yet");
        return None;
    }

    match Date::parse(raw.trim(), RELEASE_DATE) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Treating release date {raw:?} as unknown: {e}");
            None
        }
    }
}
