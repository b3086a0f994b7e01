use crate::Result;
use async_trait::async_trait;
use common::{AppId, CancellationToken};
use discord::Digest;
use notion::{Properties, Row};
use steam::{GameDetails, WishlistEntry};

#[async_trait]
pub trait WishlistSource: Send + Sync {
    async fn wishlist(&self) -> Result<Vec<WishlistEntry>>;
    async fn game_details(&self, app_id: AppId) -> Result<GameDetails>;
}

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Every row in the database, across all pages.
    async fn rows(&self) -> Result<Vec<Row>>;
    async fn create(&self, properties: &Properties) -> Result<()>;
    async fn update(&self, row_id: &str, properties: &Properties) -> Result<()>;
    /// Soft delete.
    async fn trash(&self, row_id: &str) -> Result<()>;
}

#[async_trait]
pub trait DigestNotifier: Send + Sync {
    async fn notify(&self, digest: &Digest, cancel: &CancellationToken) -> Result<()>;
}

#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, message: &str) -> Result<()>;
}

#[async_trait]
impl WishlistSource for steam::Client {
    async fn wishlist(&self) -> Result<Vec<WishlistEntry>> {
        Ok(self.fetch_wishlist().await?)
    }

    async fn game_details(&self, app_id: AppId) -> Result<GameDetails> {
        Ok(self.fetch_game_details(app_id).await?)
    }
}

#[async_trait]
impl WishlistRepository for notion::Client {
    async fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.query_all().await?)
    }

    async fn create(&self, properties: &Properties) -> Result<()> {
        Ok(self.create_page(properties).await?)
    }

    async fn update(&self, row_id: &str, properties: &Properties) -> Result<()> {
        Ok(self.update_page(row_id, properties).await?)
    }

    async fn trash(&self, row_id: &str) -> Result<()> {
        Ok(self.trash_page(row_id).await?)
    }
}

#[async_trait]
impl DigestNotifier for discord::Client {
    async fn notify(&self, digest: &Digest, cancel: &CancellationToken) -> Result<()> {
        Ok(self.notify_digest(digest, cancel).await?)
    }
}

#[async_trait]
impl ErrorReporter for discord::Client {
    async fn report(&self, message: &str) -> Result<()> {
        Ok(self.report_error(message).await?)
    }
}
