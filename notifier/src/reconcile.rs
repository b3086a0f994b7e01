use crate::service::{DigestNotifier, WishlistRepository, WishlistSource};
use crate::{Error, Result};
use common::{AppId, CancellationToken, Cancelled, RateLimiter};
use discord::{Digest, DigestEntry};
use futures::future::try_join_all;
use notion::{Properties, Row};
use std::collections::HashMap;
use std::future::Future;
use steam::GameDetails;

/// Unofficial Steam Store API: no published limit.
pub const STEAM_RATE_PER_SECOND: u32 = 5;
/// Notion's documented average for an integration.
pub const NOTION_RATE_PER_SECOND: u32 = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub notified: usize,
}

/// Outcome of comparing a fresh price against the lowest price on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowestPrice {
    /// Either side is unknown, so the history is no longer trusted.
    Unknown,
    Dropped { previous: u64, current: u64 },
    Unchanged(u64),
}

impl LowestPrice {
    pub fn evaluate(stored: Option<u64>, current: Option<u64>) -> Self {
        match (stored, current) {
            (Some(previous), Some(current)) if current < previous => {
                Self::Dropped { previous, current }
            }
            (Some(previous), Some(_)) => Self::Unchanged(previous),
            _ => Self::Unknown,
        }
    }

    pub fn value(self) -> Option<u64> {
        match self {
            Self::Unknown => None,
            Self::Dropped { current, .. } => Some(current),
            Self::Unchanged(previous) => Some(previous),
        }
    }
}

/// Indexes rows by the app ID stored in their title. A row whose app ID is not an
/// unsigned integer cannot be matched against Steam, which fails the whole run.
pub fn index_rows(rows: Vec<Row>) -> Result<HashMap<AppId, Row>> {
    rows.into_iter()
        .map(|row| match row.properties.app_id.parse::<AppId>() {
            Ok(app_id) => Ok((app_id, row)),
            Err(_) => {
                log::error!(
                    "Notion row {} has invalid app ID {:?}",
                    row.id,
                    row.properties.app_id
                );
                Err(Error::InvalidAppId {
                    row_id: row.id,
                    app_id: row.properties.app_id,
                })
            }
        })
        .collect()
}

/// Three-way split of Steam state against Notion state. Every app ID lands in exactly one list.
#[derive(Debug, Default)]
pub struct Plan {
    pub to_create: Vec<GameDetails>,
    pub to_update: Vec<(GameDetails, Row)>,
    pub to_delete: Vec<Row>,
}

impl Plan {
    pub fn new(details: HashMap<AppId, GameDetails>, mut rows: HashMap<AppId, Row>) -> Self {
        let mut plan = Self::default();

        for (app_id, game) in details {
            match rows.remove(&app_id) {
                Some(row) => plan.to_update.push((game, row)),
                None => plan.to_create.push(game),
            }
        }
        plan.to_delete = rows.into_values().collect();

        plan
    }
}

fn current_price(game: &GameDetails) -> Result<Option<u64>> {
    Ok(game
        .current_price
        .as_deref()
        .map(steam::normalize_price)
        .transpose()?)
}

fn properties(
    game: &GameDetails,
    current_price: Option<u64>,
    lowest_price: Option<u64>,
) -> Properties {
    Properties {
        app_id: game.app_id.to_string(),
        name: game.title.clone(),
        current_price,
        lowest_price,
        release_date: steam::normalize_release_date(&game.release_date),
    }
}

/// Waits for a token, then runs `op` unless the run is cancelled first.
async fn throttled<T, F>(limiter: &RateLimiter, cancel: &CancellationToken, op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    limiter.acquire(cancel).await?;
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Cancelled.into()),
        result = op => result,
    }
}

pub struct Reconciler<S, R, N> {
    source: S,
    repository: R,
    notifier: N,
    steam_limiter: RateLimiter,
    notion_limiter: RateLimiter,
}

impl<S, R, N> Reconciler<S, R, N>
where
    S: WishlistSource,
    R: WishlistRepository,
    N: DigestNotifier,
{
    pub fn new(source: S, repository: R, notifier: N) -> Self {
        Self::with_limiters(
            source,
            repository,
            notifier,
            RateLimiter::new(STEAM_RATE_PER_SECOND),
            RateLimiter::new(NOTION_RATE_PER_SECOND),
        )
    }

    pub fn with_limiters(
        source: S,
        repository: R,
        notifier: N,
        steam_limiter: RateLimiter,
        notion_limiter: RateLimiter,
    ) -> Self {
        Self {
            source,
            repository,
            notifier,
            steam_limiter,
            notion_limiter,
        }
    }

    /// One full pass: read both sides, write the difference back to Notion, announce drops.
    ///
    /// Each batch fails fast: the first error drops the rest of the batch and ends the run.
    /// Writes that already reached Notion are not rolled back.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<Summary> {
        let details = self.fetch_details(cancel).await?;
        let rows = self.repository.rows().await?;
        let plan = Plan::new(details, index_rows(rows)?);

        log::info!(
            "Reconciling: {} to create, {} to update, {} to delete",
            plan.to_create.len(),
            plan.to_update.len(),
            plan.to_delete.len()
        );

        self.create_rows(&plan.to_create, cancel).await?;
        let digest = self.update_rows(&plan.to_update, cancel).await?;
        self.trash_rows(&plan.to_delete, cancel).await?;

        if digest.is_empty() {
            log::info!("No price drops to announce");
        } else {
            self.notifier.notify(&digest, cancel).await?;
        }

        Ok(Summary {
            created: plan.to_create.len(),
            updated: plan.to_update.len(),
            deleted: plan.to_delete.len(),
            notified: digest.len(),
        })
    }

    async fn fetch_details(
        &self,
        cancel: &CancellationToken,
    ) -> Result<HashMap<AppId, GameDetails>> {
        let wishlist = self.source.wishlist().await?;

        let details = try_join_all(wishlist.iter().map(|entry| {
            throttled(&self.steam_limiter, cancel, self.source.game_details(entry.app_id))
        }))
        .await
        .inspect_err(|e| log::error!("Failed to fetch game details: {e}"))?;

        Ok(details.into_iter().map(|game| (game.app_id, game)).collect())
    }

    async fn create_rows(
        &self,
        to_create: &[GameDetails],
        cancel: &CancellationToken,
    ) -> Result<()> {
        try_join_all(to_create.iter().map(|game| {
            throttled(&self.notion_limiter, cancel, async move {
                let current_price = current_price(game)?;
                log::debug!("Creating row for app {}", game.app_id);
                self.repository
                    .create(&properties(game, current_price, None))
                    .await
            })
        }))
        .await
        .inspect_err(|e| log::error!("Failed to create Notion rows: {e}"))?;

        Ok(())
    }

    /// Updates every matched row and returns the games whose price fell below the recorded low.
    async fn update_rows(
        &self,
        to_update: &[(GameDetails, Row)],
        cancel: &CancellationToken,
    ) -> Result<Digest> {
        let drops = try_join_all(to_update.iter().map(|(game, row)| {
            throttled(&self.notion_limiter, cancel, async move {
                let current_price = current_price(game)?;
                let lowest = LowestPrice::evaluate(row.properties.lowest_price, current_price);

                log::debug!("Updating row {} for app {}: {lowest:?}", row.id, game.app_id);
                self.repository
                    .update(&row.id, &properties(game, current_price, lowest.value()))
                    .await?;

                Ok(match lowest {
                    LowestPrice::Dropped { previous, current } => Some((
                        game.app_id,
                        DigestEntry {
                            title: game.title.clone(),
                            current_price: current,
                            lowest_price: previous,
                        },
                    )),
                    _ => None,
                })
            })
        }))
        .await
        .inspect_err(|e| log::error!("Failed to update Notion rows: {e}"))?;

        Ok(drops.into_iter().flatten().collect())
    }

    async fn trash_rows(&self, to_delete: &[Row], cancel: &CancellationToken) -> Result<()> {
        try_join_all(to_delete.iter().map(|row| {
            throttled(&self.notion_limiter, cancel, async move {
                log::debug!("Trashing row {} for app {}", row.id, row.properties.app_id);
                self.repository.trash(&row.id).await
            })
        }))
        .await
        .inspect_err(|e| log::error!("Failed to delete Notion rows: {e}"))?;

        Ok(())
    }
}
