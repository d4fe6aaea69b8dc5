use serde::{Deserialize, Serialize};

/// Query for `GET /deals/list/v2`.
#[derive(Debug, Clone, Serialize)]
pub struct DealsQuery {
    /// Comma-separated shop ids. 61 is Steam.
    pub shops: String,
    pub sort: String,
    /// Minimum price cut, in percent.
    pub cut: u8,
    pub limit: u32,
}

impl Default for DealsQuery {
    fn default() -> Self {
        Self {
            shops: crate::STEAM_SHOP_ID.to_string(),
            sort: "-cut".to_string(),
            cut: 100,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealsPage {
    #[serde(default)]
    pub list: Vec<DealEntry>,
    #[serde(default, rename = "hasMore")]
    pub has_more: bool,
}

/// One game in the deals list.
#[derive(Debug, Clone, Deserialize)]
pub struct DealEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deal: Option<Deal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deal {
    #[serde(default)]
    pub cut: u8,
    #[serde(default)]
    pub regular: Option<Price>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}
