use anyhow::Result;
use common::{CancellationToken, RateLimiter};
use notifier::{AppConfig, ErrorReporter, Reconciler};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    common::setup_env();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            if let Ok(discord) = discord::Config::from_env() {
                report(&discord, &e.to_string()).await;
            }
            return Err(e.into());
        }
    };

    let discord = discord::Client::new(
        &config.discord,
        Arc::new(RateLimiter::new(discord::RATE_PER_SECOND)),
    )?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let reconciler = Reconciler::new(
        steam::Client::new(config.steam),
        notion::Client::new(config.notion)?,
        discord.clone(),
    );

    notifier::run_and_report(&reconciler, &discord, &cancel).await?;
    Ok(())
}

async fn report(config: &discord::Config, message: &str) {
    let limiter = Arc::new(RateLimiter::new(discord::RATE_PER_SECOND));
    match discord::Client::new(config, limiter) {
        Ok(client) => {
            if let Err(e) = client.report(message).await {
                log::error!("Failed to report the error: {e}");
            }
        }
        Err(e) => log::error!("Failed to build the Discord client: {e}"),
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        log::warn!("Interrupted, cancelling the run");
        cancel.cancel();
    }
}
