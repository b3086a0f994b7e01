use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Steam error: {0}")]
    Steam(#[from] steam::Error),

    #[error("Notion error: {0}")]
    Notion(#[from] notion::Error),

    #[error("Discord error: {0}")]
    Discord(#[from] discord::Error),

    #[error("Notion row {row_id} has an invalid app ID {app_id:?}")]
    InvalidAppId { row_id: String, app_id: String },

    #[error(transparent)]
    Cancelled(#[from] common::Cancelled),

    #[error(transparent)]
    Config(#[from] common::MissingVars),
}
