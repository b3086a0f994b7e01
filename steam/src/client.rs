use crate::endpoint::Endpoint;
use crate::{Error, Result};
use common::{require_vars, truncate, AppId, MissingVars, BODY_SNIPPET_CHARS};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

pub const API_URL: &str = "https://api.steampowered.com";
pub const STORE_URL: &str = "https://store.steampowered.com";
const COUNTRY_CODE: &str = "jp";

#[derive(Clone, Debug)]
pub struct Config {
    pub user_id: String,
}

impl Config {
    pub fn from_env() -> std::result::Result<Self, MissingVars> {
        let [user_id] = require_vars(["STEAM_USER_ID"])?;
        Ok(Self { user_id })
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WishlistEntry {
    #[serde(rename = "appid")]
    pub app_id: AppId,
}

#[derive(Deserialize)]
struct WishlistResponse {
    response: WishlistItems,
}

#[derive(Deserialize)]
struct WishlistItems {
    #[serde(default)]
    items: Vec<WishlistEntry>,
}

/// Store details for one app, before any normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub app_id: AppId,
    pub title: String,
    /// Integer price with two implicit fraction digits. `None` when the game is not on sale.
    pub current_price: Option<String>,
    pub release_date: String,
}

#[derive(Deserialize)]
struct AppDetails {
    data: AppData,
}

#[derive(Deserialize)]
struct AppData {
    name: String,
    price_overview: Option<PriceOverview>,
    release_date: ReleaseDate,
}

#[derive(Deserialize)]
struct PriceOverview {
    #[serde(rename = "final")]
    final_price: Number,
}

#[derive(Deserialize)]
struct ReleaseDate {
    date: String,
}

#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
    config: Config,
    api_url: String,
    store_url: String,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self::with_base_urls(config, API_URL, STORE_URL)
    }

    pub fn with_base_urls(config: Config, api_url: &str, store_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_url: api_url.trim_end_matches('/').to_string(),
            store_url: store_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        let base = match endpoint {
            Endpoint::Wishlist => &self.api_url,
            Endpoint::AppDetails => &self.store_url,
        };
        format!("{base}{endpoint}")
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .inspect_err(|e| log::error!("Failed to send request to {endpoint}: {e}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Unexpected status {status} from {endpoint}");
            let body = response.text().await?;
            return Err(Error::Response(status, truncate(&body, BODY_SNIPPET_CHARS)));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to decode response from {endpoint}: {e}");
            Error::Deserialize(format!("{e}: {}", truncate(&text, BODY_SNIPPET_CHARS)))
        })
    }

    pub async fn fetch_wishlist(&self) -> Result<Vec<WishlistEntry>> {
        let wishlist: WishlistResponse = self
            .get(Endpoint::Wishlist, &[("steamid", self.config.user_id.as_str())])
            .await?;

        log::info!("Fetched {} wishlist entries", wishlist.response.items.len());
        Ok(wishlist.response.items)
    }

    /// The response is keyed by the requested app ID, so it is decoded in two steps:
    /// first into a loose map, then the entry for `app_id` against a fixed shape.
    pub async fn fetch_game_details(&self, app_id: AppId) -> Result<GameDetails> {
        let key = app_id.to_string();
        let mut document: HashMap<String, Value> = self
            .get(Endpoint::AppDetails, &[("appids", key.as_str()), ("cc", COUNTRY_CODE)])
            .await?;

        let entry = document
            .remove(&key)
            .ok_or_else(|| Error::Deserialize(format!("no entry for app {key} in app details")))?;

        let details: AppDetails = serde_json::from_value(entry).map_err(|e| {
            log::error!("Unexpected app details shape for app {key}: {e}");
            Error::Deserialize(format!("app {key}: {e}"))
        })?;

        Ok(GameDetails {
            app_id,
            title: details.data.name,
            current_price: details
                .data
                .price_overview
                .map(|price| price.final_price.to_string()),
            release_date: details.data.release_date.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Client {
        let config = Config {
            user_id: "76561198000000000".to_string(),
        };
        Client::with_base_urls(config, &server.uri(), &server.uri())
    }

    fn app_details_json(app_id: &str, data: Value) -> Value {
        json!({ app_id: { "success": true, "data": data } })
    }

    #[tokio::test]
    async fn fetch_wishlist_sends_steam_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/IWishlistService/GetWishlist/v1/"))
            .and(query_param("steamid", "76561198000000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": { "items": [
                    { "appid": 1, "priority": 1, "date_added": 1700000000 },
                    { "appid": 2, "priority": 2, "date_added": 1700000001 }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let wishlist = client(&server).fetch_wishlist().await.unwrap();

        assert_eq!(
            wishlist,
            vec![
                WishlistEntry { app_id: AppId(1) },
                WishlistEntry { app_id: AppId(2) }
            ]
        );
    }

    #[tokio::test]
    async fn fetch_wishlist_tolerates_missing_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/IWishlistService/GetWishlist/v1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": {} })))
            .mount(&server)
            .await;

        assert!(client(&server).fetch_wishlist().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_wishlist_rejects_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_wishlist().await.unwrap_err();

        assert!(matches!(err, Error::Response(status, body)
            if status == StatusCode::INTERNAL_SERVER_ERROR && body == "oops"));
    }

    #[tokio::test]
    async fn fetch_wishlist_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_wishlist().await.unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn fetch_game_details_looks_up_requested_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .and(query_param("appids", "1091500"))
            .and(query_param("cc", "jp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_details_json(
                "1091500",
                json!({
                    "name": "Cyberpunk 2077",
                    "price_overview": { "currency": "JPY", "initial": 898000, "final": 449000 },
                    "release_date": { "coming_soon": false, "date": "10 Dec, 2020" }
                }),
            )))
            .expect(1)
            .mount(&server)
            .await;

        let details = client(&server)
            .fetch_game_details(AppId(1091500))
            .await
            .unwrap();

        assert_eq!(
            details,
            GameDetails {
                app_id: AppId(1091500),
                title: "Cyberpunk 2077".to_string(),
                current_price: Some("449000".to_string()),
                release_date: "10 Dec, 2020".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn fetch_game_details_without_price_overview() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_details_json(
                "2",
                json!({
                    "name": "Unreleased",
                    "release_date": { "coming_soon": true, "date": "To be announced" }
                }),
            )))
            .mount(&server)
            .await;

        let details = client(&server).fetch_game_details(AppId(2)).await.unwrap();

        assert_eq!(details.current_price, None);
        assert_eq!(details.release_date, "To be announced");
    }

    #[tokio::test]
    async fn fetch_game_details_fails_for_other_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_details_json(
                "999",
                json!({ "name": "Other", "release_date": { "date": "1 Jan, 2020" } }),
            )))
            .mount(&server)
            .await;

        let err = client(&server).fetch_game_details(AppId(2)).await.unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn fetch_game_details_fails_on_type_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(app_details_json(
                "3",
                json!({
                    "name": "Bad price",
                    "price_overview": { "final": "449000" },
                    "release_date": { "date": "1 Jan, 2020" }
                }),
            )))
            .mount(&server)
            .await;

        let err = client(&server).fetch_game_details(AppId(3)).await.unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn fetch_game_details_fails_when_data_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "4": { "success": false } })),
            )
            .mount(&server)
            .await;

        let err = client(&server).fetch_game_details(AppId(4)).await.unwrap_err();

        assert!(matches!(err, Error::Deserialize(_)));
    }

    #[tokio::test]
    async fn error_page_body_is_cut_short() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>".repeat(5000)))
            .mount(&server)
            .await;

        let err = client(&server).fetch_wishlist().await.unwrap_err();

        assert!(matches!(&err, Error::Response(_, body)
            if body.chars().count() == common::BODY_SNIPPET_CHARS && body.ends_with("...")));
    }

    #[tokio::test]
    async fn oversized_price_survives_decode_but_not_normalisation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"5":{"data":{"name":"Huge",
                    "price_overview":{"final":9223372036854775808},
                    "release_date":{"date":"1 Jan, 2020"}}}}"#,
            ))
            .mount(&server)
            .await;

        let details = client(&server).fetch_game_details(AppId(5)).await.unwrap();
        let raw = details.current_price.unwrap();

        assert_eq!(raw, "9223372036854775808");
        assert!(crate::normalize_price(&raw).is_err());
    }
}
