use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Deals ---

/// A title currently offered at a 100% discount, normalized from any source.
///
/// `id` is whatever the source calls the game: a Steam app id for the
/// storefront adapters, an IsThereAnyDeal game id for the aggregator. Two
/// deals for the same game can therefore carry different ids; the merge step
/// falls back to `name` to catch that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDeal {
    pub id: Option<String>,
    pub name: String,
    /// Regular price in major currency units. `0.0` when unknown.
    pub original_price: f64,
    pub url: String,
    pub header_image: Option<String>,
}

impl GameDeal {
    pub fn new(id: Option<String>, name: impl Into<String>, original_price: f64, url: impl Into<String>) -> Self {
        Self {
            id: id.filter(|s| !s.is_empty()),
            name: name.into(),
            original_price,
            url: url.into(),
            header_image: None,
        }
    }

    pub fn with_header_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.header_image = if image.is_empty() { None } else { Some(image) };
        self
    }

    /// Seen-set key: the id when present, otherwise the name.
    pub fn key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.name,
        }
    }

    /// The id, if it looks like a numeric Steam app id.
    pub fn steam_app_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    }
}

// --- Seen-set ---

/// A previously notified deal, as persisted in the seen file.
///
/// `found_at` is kept as the raw string so a value we cannot parse survives a
/// load/save round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeenEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_at: Option<String>,
}

impl SeenEntry {
    pub fn new(name: impl Into<String>, found_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            found_at: Some(found_at.to_rfc3339()),
        }
    }

    /// Parse `found_at`. Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f]`
    /// (read as UTC). `None` when missing or unparsable.
    pub fn discovered_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.found_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|ndt| ndt.and_utc())
    }
}
