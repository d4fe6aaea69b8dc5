pub mod error;
pub mod featured;
pub mod search;

pub use error::{Result, SteamStoreError};
pub use featured::{FeaturedCategories, FeaturedCategory, FeaturedItem};
pub use search::{parse_price, parse_search_results, strip_tracking, SearchQuery, SearchRow};

use std::time::Duration;

use serde::Serialize;

use search::SearchResponse;

const BASE_URL: &str = "https://store.steampowered.com";

/// Public store url for an app id.
pub fn app_url(app_id: &str) -> String {
    format!("{BASE_URL}/app/{app_id}")
}

/// Canonical CDN header image for an app id.
pub fn header_image_url(app_id: &str) -> String {
    format!("https://cdn.cloudflare.steamstatic.com/steam/apps/{app_id}/header.jpg")
}

/// Store search page for a free-text term, used when a source has no direct link.
pub fn search_url(term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
    format!("{BASE_URL}/search/?term={encoded}")
}

pub struct SteamStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl SteamStoreClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the storefront's featured categories (specials, top sellers, ...).
    pub async fn featured_categories(&self, country: &str) -> Result<FeaturedCategories> {
        let url = format!("{}/api/featuredcategories", self.base_url);
        let body = self.get_text(&url, &[("cc", country)]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Run a store search and parse the returned HTML fragment into rows.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>> {
        let url = format!("{}/search/results/", self.base_url);
        let body = self.get_text(&url, query).await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        let rows = parse_search_results(&parsed.results_html);
        tracing::debug!(
            rows = rows.len(),
            total = parsed.total_count.unwrap_or_default(),
            "Parsed store search results"
        );

        Ok(rows)
    }

    async fn get_text<Q: Serialize + ?Sized>(&self, url: &str, query: &Q) -> Result<String> {
        let resp = self.client.get(url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SteamStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}

impl Default for SteamStoreClient {
    fn default() -> Self {
        Self::new()
    }
}
