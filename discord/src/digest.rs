use common::AppId;
use std::collections::HashMap;

pub const HEADER: &str = "## The recommended video games to buy now are as follows:";
/// Entries per message. Well under Discord's 2000 character cap for realistic titles.
pub const LINES_PER_MESSAGE: usize = 10;

/// A game whose current price dropped below the lowest price recorded so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub title: String,
    pub current_price: u64,
    pub lowest_price: u64,
}

pub type Digest = HashMap<AppId, DigestEntry>;

impl DigestEntry {
    fn line(&self) -> String {
        format!(
            "- Title: **{}**  |  Current Price: **{} (JPY)**  |  Lowest Price: **{} (JPY)**",
            self.title, self.current_price, self.lowest_price
        )
    }
}

/// Renders the digest as message bodies: entries sorted by title, at most
/// [`LINES_PER_MESSAGE`] per message, each message led by [`HEADER`].
pub fn render_messages(digest: &Digest) -> Vec<String> {
    let mut entries: Vec<_> = digest.iter().collect();
    entries.sort_by(|(a_id, a), (b_id, b)| a.title.cmp(&b.title).then(a_id.cmp(b_id)));

    entries
        .chunks(LINES_PER_MESSAGE)
        .map(|chunk| {
            std::iter::once(HEADER.to_string())
                .chain(chunk.iter().map(|(_, entry)| entry.line()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}
