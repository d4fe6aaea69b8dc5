use serde::Deserialize;

/// Response of `GET /api/featuredcategories`. Only the buckets that can carry
/// discounted items are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedCategories {
    #[serde(default)]
    pub specials: Option<FeaturedCategory>,
    #[serde(default)]
    pub coming_soon: Option<FeaturedCategory>,
    #[serde(default)]
    pub top_sellers: Option<FeaturedCategory>,
}

impl FeaturedCategories {
    /// The scanned buckets, in a fixed order: specials, coming_soon, top_sellers.
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, &FeaturedCategory)> {
        [
            ("specials", self.specials.as_ref()),
            ("coming_soon", self.coming_soon.as_ref()),
            ("top_sellers", self.top_sellers.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, cat)| cat.map(|c| (name, c)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedCategory {
    #[serde(default)]
    pub items: Vec<FeaturedItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedItem {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<u32>,
    /// Regular price in minor units (cents).
    #[serde(default)]
    pub original_price: Option<u64>,
    #[serde(default)]
    pub header_image: Option<String>,
}

impl FeaturedItem {
    pub fn is_free_promo(&self) -> bool {
        self.discount_percent == Some(100)
    }

    /// Regular price converted to major units. `0.0` when absent.
    pub fn original_price_major(&self) -> f64 {
        self.original_price.unwrap_or(0) as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_skip_missing_categories() {
        let parsed: FeaturedCategories = serde_json::from_str(
            r#"{
                "specials": { "id": "cat_specials", "items": [] },
                "top_sellers": { "id": "cat_topsellers", "items": [] },
                "new_releases": { "id": "cat_newreleases", "items": [] }
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = parsed.buckets().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["specials", "top_sellers"]);
    }

    #[test]
    fn converts_cents_to_major_units() {
        let item: FeaturedItem = serde_json::from_str(
            r#"{ "id": 10, "name": "Counter-Strike", "discount_percent": 100, "original_price": 999 }"#,
        )
        .unwrap();
        assert!(item.is_free_promo());
        assert!((item.original_price_major() - 9.99).abs() < 1e-9);
    }

    #[test]
    fn missing_price_is_zero() {
        let item: FeaturedItem =
            serde_json::from_str(r#"{ "id": 10, "original_price": null }"#).unwrap();
        assert!(!item.is_free_promo());
        assert_eq!(item.original_price_major(), 0.0);
    }
}
