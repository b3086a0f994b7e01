use crate::schema::{Properties, Row};
use crate::{Error, Result};
use common::{require_vars, truncate, MissingVars, BODY_SNIPPET_CHARS};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

pub const BASE_URL: &str = "https://api.notion.com/v1/";
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub database_id: String,
}

impl Config {
    pub fn from_env() -> std::result::Result<Self, MissingVars> {
        let [api_key, database_id] = require_vars(["NOTION_API_KEY", "NOTION_DATABASE_ID"])?;
        Ok(Self {
            api_key,
            database_id,
        })
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    results: Vec<Row>,
    next_cursor: Option<String>,
}

#[derive(Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Serialize)]
struct NewPage<'a> {
    parent: Parent<'a>,
    properties: &'a Properties,
}

#[derive(Serialize)]
struct PageUpdate<'a> {
    properties: &'a Properties,
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    config: Config,
    base_url: Url,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_base_url(config, BASE_URL)
    }

    pub fn with_base_url(config: Config, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            config,
            base_url,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends an authenticated request and fails on anything but `200 OK`.
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let path = url.path().to_string();
        let response = self
            .client
            .request(method, url)
            .bearer_auth(&self.config.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .inspect_err(|e| log::error!("Failed to send Notion request to {path}: {e}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Unexpected status {status} from Notion {path}");
            let body = response.text().await?;
            return Err(Error::Response(status, truncate(&body, BODY_SNIPPET_CHARS)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to decode Notion response from {path}: {e}");
            Error::Deserialize(format!("{e}: {}", truncate(&text, BODY_SNIPPET_CHARS)))
        })
    }

    async fn query_page(&self, start_cursor: Option<&str>) -> Result<QueryResponse> {
        let url = self.url(&["databases", self.config.database_id.as_str(), "query"])?;
        self.request(Method::POST, url, &QueryBody { start_cursor })
            .await
    }

    /// Fetches every row, following `next_cursor` until the database reports no more pages.
    pub async fn query_all(&self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            pages += 1;
            rows.extend(page.results);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        log::info!("Fetched {} Notion rows over {pages} page(s)", rows.len());
        Ok(rows)
    }

    pub async fn create_page(&self, properties: &Properties) -> Result<()> {
        let body = NewPage {
            parent: Parent {
                database_id: &self.config.database_id,
            },
            properties,
        };
        self.request::<Value, _>(Method::POST, self.url(&["pages"])?, &body)
            .await?;
        Ok(())
    }

    pub async fn update_page(&self, page_id: &str, properties: &Properties) -> Result<()> {
        let body = PageUpdate { properties };
        self.request::<Value, _>(Method::PATCH, self.url(&["pages", page_id])?, &body)
            .await?;
        Ok(())
    }

    /// Moves the page to the trash instead of deleting it outright.
    pub async fn trash_page(&self, page_id: &str) -> Result<()> {
        self.request::<Value, _>(
            Method::PATCH,
            self.url(&["pages", page_id])?,
            &json!({ "in_trash": true }),
        )
        .await?;
        Ok(())
    }
}
