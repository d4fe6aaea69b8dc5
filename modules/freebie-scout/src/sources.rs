// Deal sources: one adapter per upstream, all behind `DealSource`.
//
// Adapters return `Result` so a cycle can tell "nothing free right now" from
// "source unreachable". `fetch_all` is the boundary where errors stop: each
// failure is logged and becomes an empty list for that source only.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use freebie_common::{FreebieConfig, GameDeal};
use itad_client::{DealEntry, DealsQuery, ItadClient, ItadError};
use steam_store_client::{
    app_url, search_url, FeaturedCategories, SearchQuery, SearchRow, SteamStoreClient,
    SteamStoreError,
};

const UNKNOWN_TITLE: &str = "Unknown game";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} not set, source skipped")]
    NotConfigured(&'static str),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ItadError> for SourceError {
    fn from(err: ItadError) -> Self {
        match err {
            ItadError::Network(msg) => SourceError::Transport(msg),
            ItadError::Api { status, message } => SourceError::Api { status, message },
            ItadError::Parse(msg) => SourceError::Parse(msg),
        }
    }
}

impl From<SteamStoreError> for SourceError {
    fn from(err: SteamStoreError) -> Self {
        match err {
            SteamStoreError::Network(msg) => SourceError::Transport(msg),
            SteamStoreError::Api { status, message } => SourceError::Api { status, message },
            SteamStoreError::Parse(msg) => SourceError::Parse(msg),
        }
    }
}

#[async_trait]
pub trait DealSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch the titles this source currently reports at 100% off.
    async fn fetch(&self) -> Result<Vec<GameDeal>, SourceError>;
}

/// What one source produced in a cycle.
#[derive(Debug)]
pub struct SourceReport {
    pub source: &'static str,
    pub deals: Vec<GameDeal>,
    pub error: Option<SourceError>,
}

/// Query every source in order, one at a time. Never fails: a failing source
/// contributes an empty list and its error is kept on the report.
pub async fn fetch_all(sources: &[Box<dyn DealSource>]) -> Vec<SourceReport> {
    let mut reports = Vec::with_capacity(sources.len());

    for source in sources {
        let name = source.name();
        let report = match source.fetch().await {
            Ok(deals) => {
                info!(source = name, count = deals.len(), "Source fetched");
                SourceReport {
                    source: name,
                    deals,
                    error: None,
                }
            }
            Err(e) => {
                match &e {
                    SourceError::NotConfigured(_) => info!(source = name, "{e}"),
                    _ => warn!(source = name, error = %e, "Source failed, continuing without it"),
                }
                SourceReport {
                    source: name,
                    deals: Vec::new(),
                    error: Some(e),
                }
            }
        };
        reports.push(report);
    }

    reports
}

/// The production sources in merge priority order: official API, aggregator, scrape.
pub fn default_sources(config: &FreebieConfig) -> Vec<Box<dyn DealSource>> {
    vec![
        Box::new(SteamFeaturedSource::new(SteamStoreClient::new(), &config.steam_country)),
        Box::new(ItadSource::new(config.itad_api_key.as_deref())),
        Box::new(SteamSearchSource::new(SteamStoreClient::new(), &config.steam_country)),
    ]
}

// ---------------------------------------------------------------------------
// Steam featured categories (official JSON API)
// ---------------------------------------------------------------------------

pub struct SteamFeaturedSource {
    client: SteamStoreClient,
    country: String,
}

impl SteamFeaturedSource {
    pub fn new(client: SteamStoreClient, country: &str) -> Self {
        Self {
            client,
            country: country.to_string(),
        }
    }
}

#[async_trait]
impl DealSource for SteamFeaturedSource {
    fn name(&self) -> &'static str {
        "steam_featured"
    }

    async fn fetch(&self) -> Result<Vec<GameDeal>, SourceError> {
        let featured = self.client.featured_categories(&self.country).await?;
        Ok(deals_from_featured(&featured))
    }
}

/// Items at exactly 100% off across specials, coming_soon and top_sellers.
pub fn deals_from_featured(featured: &FeaturedCategories) -> Vec<GameDeal> {
    featured
        .buckets()
        .flat_map(|(_, category)| category.items.iter())
        .filter(|item| item.is_free_promo())
        .map(|item| {
            let id = item.id.to_string();
            let name = item.name.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string());
            let url = app_url(&id);
            let deal = GameDeal::new(Some(id), name, item.original_price_major(), url);
            match &item.header_image {
                Some(image) => deal.with_header_image(image.as_str()),
                None => deal,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// IsThereAnyDeal (aggregator, needs an API key)
// ---------------------------------------------------------------------------

pub struct ItadSource {
    client: Option<ItadClient>,
}

impl ItadSource {
    /// `None` key leaves the source in place but skipped every cycle.
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            client: api_key.map(ItadClient::new),
        }
    }

    pub fn with_client(client: ItadClient) -> Self {
        Self {
            client: Some(client),
        }
    }
}

#[async_trait]
impl DealSource for ItadSource {
    fn name(&self) -> &'static str {
        "itad"
    }

    async fn fetch(&self) -> Result<Vec<GameDeal>, SourceError> {
        let client = self
            .client
            .as_ref()
            .ok_or(SourceError::NotConfigured("ITAD_API_KEY"))?;
        let entries = client.list_deals(&DealsQuery::default()).await?;
        Ok(deals_from_itad(entries))
    }
}

/// Keep entries whose deal cut is exactly 100. A missing store link becomes a
/// store search for the title.
pub fn deals_from_itad(entries: Vec<DealEntry>) -> Vec<GameDeal> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let deal = entry.deal?;
            if deal.cut != 100 {
                return None;
            }

            let name = entry
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
            let original_price = deal.regular.map(|p| p.amount).unwrap_or(0.0);
            let url = deal
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| search_url(&name));

            Some(GameDeal::new(entry.id, name, original_price, url))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Steam search results (HTML scrape fallback)
// ---------------------------------------------------------------------------

pub struct SteamSearchSource {
    client: SteamStoreClient,
    country: String,
}

impl SteamSearchSource {
    pub fn new(client: SteamStoreClient, country: &str) -> Self {
        Self {
            client,
            country: country.to_string(),
        }
    }
}

#[async_trait]
impl DealSource for SteamSearchSource {
    fn name(&self) -> &'static str {
        "steam_search"
    }

    async fn fetch(&self) -> Result<Vec<GameDeal>, SourceError> {
        let rows = self
            .client
            .search(&SearchQuery::specials_by_price(&self.country))
            .await?;
        Ok(deals_from_search(rows))
    }
}

/// Rows labelled exactly `-100%`.
pub fn deals_from_search(rows: Vec<SearchRow>) -> Vec<GameDeal> {
    rows.into_iter()
        .filter(SearchRow::is_free_promo)
        .map(|row| {
            let original_price = row.original_price().unwrap_or(0.0);
            GameDeal::new(row.app_id, row.title, original_price, row.url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itad_client::{Deal, Price};

    fn itad_entry(id: &str, title: Option<&str>, cut: u8, url: Option<&str>) -> DealEntry {
        DealEntry {
            id: Some(id.to_string()),
            title: title.map(String::from),
            deal: Some(Deal {
                cut,
                regular: Some(Price {
                    amount: 24.99,
                    currency: Some("USD".into()),
                }),
                url: url.map(String::from),
            }),
        }
    }

    #[test]
    fn itad_keeps_full_cut_only() {
        let deals = deals_from_itad(vec![
            itad_entry("a", Some("Free"), 100, Some("https://itad.link/a/")),
            itad_entry("b", Some("Cheap"), 90, Some("https://itad.link/b/")),
        ]);
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].id.as_deref(), Some("a"));
        assert_eq!(deals[0].original_price, 24.99);
        assert_eq!(deals[0].url, "https://itad.link/a/");
    }

    #[test]
    fn itad_synthesizes_search_url() {
        let deals = deals_from_itad(vec![itad_entry("a", Some("Dead Cells"), 100, None)]);
        assert_eq!(
            deals[0].url,
            "https://store.steampowered.com/search/?term=Dead+Cells"
        );
    }

    #[test]
    fn itad_defaults_missing_title() {
        let deals = deals_from_itad(vec![itad_entry("a", None, 100, Some("u"))]);
        assert_eq!(deals[0].name, UNKNOWN_TITLE);
    }

    #[test]
    fn itad_skips_entries_without_deal() {
        let deals = deals_from_itad(vec![DealEntry {
            id: Some("x".into()),
            title: Some("Listed".into()),
            deal: None,
        }]);
        assert!(deals.is_empty());
    }

    #[test]
    fn featured_maps_items() {
        let featured: FeaturedCategories = serde_json::from_str(
            r#"{
                "specials": { "items": [
                    { "id": 200, "name": "Gift", "discount_percent": 100, "original_price": 1499, "header_image": "https://cdn/200.jpg" },
                    { "id": 201, "name": "Sale", "discount_percent": 75, "original_price": 1000 }
                ] },
                "top_sellers": { "items": [
                    { "id": 300, "discount_percent": 100, "original_price": null, "header_image": "" }
                ] }
            }"#,
        )
        .unwrap();

        let deals = deals_from_featured(&featured);
        assert_eq!(deals.len(), 2);

        assert_eq!(deals[0].id.as_deref(), Some("200"));
        assert_eq!(deals[0].original_price, 14.99);
        assert_eq!(deals[0].url, "https://store.steampowered.com/app/200");
        assert_eq!(deals[0].header_image.as_deref(), Some("https://cdn/200.jpg"));

        assert_eq!(deals[1].name, UNKNOWN_TITLE);
        assert_eq!(deals[1].original_price, 0.0);
        assert!(deals[1].header_image.is_none());
    }

    #[test]
    fn search_keeps_free_rows() {
        let rows = vec![
            SearchRow {
                app_id: Some("9".into()),
                title: "Gift".into(),
                discount_label: Some("-100%".into()),
                original_price_text: Some("$3.99".into()),
                url: "https://store.steampowered.com/app/9/Gift/".into(),
            },
            SearchRow {
                app_id: Some("10".into()),
                title: "Almost".into(),
                discount_label: Some("-90%".into()),
                original_price_text: Some("$3.99".into()),
                url: "https://store.steampowered.com/app/10/Almost/".into(),
            },
            SearchRow {
                app_id: None,
                title: "Bundle".into(),
                discount_label: Some("-100%".into()),
                original_price_text: None,
                url: "https://store.steampowered.com/bundle/1/".into(),
            },
        ];

        let deals = deals_from_search(rows);
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].original_price, 3.99);
        assert_eq!(deals[1].id, None);
        assert_eq!(deals[1].original_price, 0.0);
    }

    #[tokio::test]
    async fn itad_without_key_is_not_configured() {
        let source = ItadSource::new(None);
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured("ITAD_API_KEY")));
    }
}
