use crate::Result;
use common::require_vars;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub steam: steam::Config,
    pub notion: notion::Config,
    pub discord: discord::Config,
}

impl AppConfig {
    /// Reads every setting from the environment, reporting all missing variables together.
    pub fn from_env() -> Result<Self> {
        let [user_id, api_key, database_id, webhook_id, webhook_token] = require_vars([
            "STEAM_USER_ID",
            "NOTION_API_KEY",
            "NOTION_DATABASE_ID",
            "DISCORD_WEBHOOK_ID",
            "DISCORD_WEBHOOK_TOKEN",
        ])?;

        Ok(Self {
            steam: steam::Config { user_id },
            notion: notion::Config {
                api_key,
                database_id,
            },
            discord: discord::Config {
                webhook_id,
                webhook_token,
            },
        })
    }
}
