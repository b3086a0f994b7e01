use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Response(reqwest::StatusCode, String),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
