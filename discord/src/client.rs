use crate::digest::{render_messages, Digest};
use crate::{Error, Result};
use common::{
    require_vars, truncate, CancellationToken, MissingVars, RateLimiter, BODY_SNIPPET_CHARS,
};
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

pub const BASE_URL: &str = "https://discord.com/api/";
pub const RATE_PER_SECOND: u32 = 5;
/// Below Discord's 2000 character cap on message content.
pub const MAX_CONTENT_CHARS: usize = 1900;

#[derive(Clone, Debug)]
pub struct Config {
    pub webhook_id: String,
    pub webhook_token: String,
}

impl Config {
    pub fn from_env() -> std::result::Result<Self, MissingVars> {
        let [webhook_id, webhook_token] =
            require_vars(["DISCORD_WEBHOOK_ID", "DISCORD_WEBHOOK_TOKEN"])?;
        Ok(Self {
            webhook_id,
            webhook_token,
        })
    }
}

#[derive(Serialize)]
struct Message<'a> {
    content: &'a str,
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    webhook_url: Url,
    /// Shared by clones.
    limiter: Arc<RateLimiter>,
}

impl Client {
    pub fn new(config: &Config, limiter: Arc<RateLimiter>) -> Result<Self> {
        Self::with_base_url(config, BASE_URL, limiter)
    }

    pub fn with_base_url(
        config: &Config,
        base_url: &str,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let mut webhook_url = Url::parse(base_url)?;
        webhook_url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend([
                "webhooks",
                config.webhook_id.as_str(),
                config.webhook_token.as_str(),
            ]);

        Ok(Self {
            client: reqwest::Client::new(),
            webhook_url,
            limiter,
        })
    }

    async fn post(&self, content: &str) -> Result<()> {
        // The webhook URL carries the token, so it never reaches logs or error text.
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&Message { content })
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .inspect_err(|e| log::error!("Failed to send Discord webhook request: {e}"))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            log::error!("Unexpected status {status} from Discord webhook");
            let body = response.text().await.map_err(reqwest::Error::without_url)?;
            return Err(Error::Response(status, truncate(&body, BODY_SNIPPET_CHARS)));
        }

        Ok(())
    }

    /// Posts the digest as one webhook call per chunk, in order, each behind the rate limiter.
    pub async fn notify_digest(&self, digest: &Digest, cancel: &CancellationToken) -> Result<()> {
        let messages = render_messages(digest);
        log::info!(
            "Posting {} price drop(s) in {} Discord message(s)",
            digest.len(),
            messages.len()
        );

        for message in &messages {
            self.limiter.acquire(cancel).await?;
            self.post(message).await?;
        }

        Ok(())
    }

    /// Posts one error message, cut to fit Discord's content limit.
    pub async fn report_error(&self, error: &str) -> Result<()> {
        let content = format!("## An error occurred:\n- {error}");
        self.post(&truncate(&content, MAX_CONTENT_CHARS)).await
    }
}
