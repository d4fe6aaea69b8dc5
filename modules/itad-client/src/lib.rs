pub mod error;
pub mod types;

pub use error::{ItadError, Result};
pub use types::{Deal, DealEntry, DealsPage, DealsQuery, Price};

use std::time::Duration;

const BASE_URL: &str = "https://api.isthereanydeal.com";

/// IsThereAnyDeal shop id for Steam.
pub const STEAM_SHOP_ID: u32 = 61;

pub struct ItadClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ItadClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch one page of current deals matching `query`.
    pub async fn list_deals(&self, query: &DealsQuery) -> Result<Vec<DealEntry>> {
        let url = format!("{}/deals/list/v2", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ItadError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let page: DealsPage = serde_json::from_str(&body)?;
        tracing::debug!(
            count = page.list.len(),
            has_more = page.has_more,
            "Fetched ITAD deals page"
        );

        Ok(page.list)
    }
}
