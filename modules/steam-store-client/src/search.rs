use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Query for the storefront's internal `GET /search/results/` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub start: u32,
    pub count: u32,
    /// `1` restricts results to discounted items.
    pub specials: u8,
    pub sort_by: String,
    /// `1` makes the endpoint answer JSON with an HTML fragment.
    pub infinite: u8,
    pub cc: String,
}

impl SearchQuery {
    /// Discounted items, cheapest first.
    pub fn specials_by_price(country: &str) -> Self {
        Self {
            query: String::new(),
            start: 0,
            count: 50,
            specials: 1,
            sort_by: "Price_ASC".to_string(),
            infinite: 1,
            cc: country.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results_html: String,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// One parsed row of the search results fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRow {
    pub app_id: Option<String>,
    pub title: String,
    /// Discount label as displayed, e.g. `-100%`.
    pub discount_label: Option<String>,
    /// Struck-through regular price as displayed, e.g. `$19.99`.
    pub original_price_text: Option<String>,
    /// Store url with tracking query parameters removed.
    pub url: String,
}

impl SearchRow {
    pub fn is_free_promo(&self) -> bool {
        self.discount_label.as_deref() == Some("-100%")
    }

    pub fn original_price(&self) -> Option<f64> {
        self.original_price_text.as_deref().and_then(parse_price)
    }
}

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.search_result_row").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.title").expect("valid selector"));
// Current markup first, then the pre-2023 layout.
static DISCOUNT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".discount_pct, .search_discount span").expect("valid selector")
});
static ORIGINAL_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".discount_original_price, .search_price strike").expect("valid selector")
});
static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,\s]*").expect("valid regex"));

/// Parse the `results_html` fragment into rows.
///
/// Rows missing a title or href are skipped; the rest of the fragment is
/// still parsed.
pub fn parse_search_results(html: &str) -> Vec<SearchRow> {
    let fragment = Html::parse_fragment(html);
    let mut rows = Vec::new();

    for element in fragment.select(&ROW) {
        match parse_row(&element) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                tracing::debug!(reason, "Skipping unparsable search row");
            }
        }
    }

    rows
}

fn parse_row(element: &ElementRef) -> Result<SearchRow, &'static str> {
    let href = element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or("missing href")?;

    let title = first_text(element, &TITLE).ok_or("missing title")?;

    // Bundles list several ids, e.g. "1,2,3"
    let app_id = element
        .value()
        .attr("data-ds-appid")
        .and_then(|ids| ids.split(',').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from);

    Ok(SearchRow {
        app_id,
        title,
        discount_label: first_text(element, &DISCOUNT),
        original_price_text: first_text(element, &ORIGINAL_PRICE),
        url: strip_tracking(href),
    })
}

fn first_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}

/// Drop the query string and fragment (`?snr=...` and friends).
pub fn strip_tracking(href: &str) -> String {
    match Url::parse(href) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or(href)
            .to_string(),
    }
}

/// Parse a displayed price such as `$19.99`, `NT$ 318`, `19,99€` or `₩ 21,500`
/// into major units. A trailing separator followed by exactly two digits is a
/// decimal point; every other separator is a thousands separator.
pub fn parse_price(text: &str) -> Option<f64> {
    let matched = PRICE_NUMBER.find(text)?.as_str();
    let cleaned: String = matched.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.trim_end_matches(['.', ',']);

    let (whole, fraction) = match cleaned.rfind(['.', ',']) {
        Some(i) if cleaned.len() - i - 1 == 2 => (&cleaned[..i], &cleaned[i + 1..]),
        _ => (cleaned, ""),
    };

    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    if fraction.is_empty() {
        digits.parse().ok()
    } else {
        format!("{digits}.{fraction}").parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_MARKUP: &str = r#"
        <a href="https://store.steampowered.com/app/1234/Free_Thing/?snr=1_7_7_2300_150_1"
           data-ds-appid="1234" data-ds-itemkey="App_1234" class="search_result_row ds_collapse_flag">
            <div class="col search_capsule"><img src="https://cdn/capsule.jpg"></div>
            <div class="responsive_search_name_combined">
                <div class="col search_name ellipsis"><span class="title">Free Thing</span></div>
                <div class="col search_price_discount_combined responsive_secondrow">
                    <div class="discount_block search_discount_block" data-discount="100">
                        <div class="discount_pct">-100%</div>
                        <div class="discount_prices">
                            <div class="discount_original_price">$19.99</div>
                            <div class="discount_final_price">Free</div>
                        </div>
                    </div>
                </div>
            </div>
        </a>
        <a href="https://store.steampowered.com/app/5678/Half_Off/?snr=1_7_7"
           data-ds-appid="5678" class="search_result_row">
            <span class="title">Half Off</span>
            <div class="discount_pct">-50%</div>
            <div class="discount_original_price">$10.00</div>
        </a>
    "#;

    #[test]
    fn parses_current_markup() {
        let rows = parse_search_results(CURRENT_MARKUP);
        assert_eq!(rows.len(), 2);

        let free = &rows[0];
        assert_eq!(free.app_id.as_deref(), Some("1234"));
        assert_eq!(free.title, "Free Thing");
        assert_eq!(free.discount_label.as_deref(), Some("-100%"));
        assert_eq!(free.url, "https://store.steampowered.com/app/1234/Free_Thing/");
        assert_eq!(free.original_price(), Some(19.99));
        assert!(free.is_free_promo());

        assert!(!rows[1].is_free_promo());
    }

    #[test]
    fn parses_legacy_markup() {
        let html = r#"
            <a href="https://store.steampowered.com/app/42/Old/?snr=x" data-ds-appid="42,43" class="search_result_row">
                <div class="col search_name"><span class="title">Old Layout</span></div>
                <div class="col search_discount responsive_secondrow"><span>-100%</span></div>
                <div class="col search_price discounted"><span><strike>$4.99</strike></span><br>Free</div>
            </a>
        "#;
        let rows = parse_search_results(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].app_id.as_deref(), Some("42"));
        assert!(rows[0].is_free_promo());
        assert_eq!(rows[0].original_price(), Some(4.99));
    }

    #[test]
    fn skips_rows_missing_title_or_href() {
        let html = r#"
            <a data-ds-appid="1" class="search_result_row"><span class="title">No Href</span></a>
            <a href="https://store.steampowered.com/app/2/" class="search_result_row"><div class="discount_pct">-100%</div></a>
            <a href="https://store.steampowered.com/app/3/" class="search_result_row"><span class="title">Kept</span></a>
        "#;
        let rows = parse_search_results(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Kept");
        assert!(rows[0].app_id.is_none());
        assert!(rows[0].discount_label.is_none());
    }

    #[test]
    fn empty_fragment_yields_nothing() {
        assert!(parse_search_results("").is_empty());
        assert!(parse_search_results("<div>no results</div>").is_empty());
    }

    #[test]
    fn strip_tracking_handles_relative_hrefs() {
        assert_eq!(strip_tracking("/app/10/?snr=1#reviews"), "/app/10/");
        assert_eq!(
            strip_tracking("https://store.steampowered.com/app/10/CS/?snr=1_7"),
            "https://store.steampowered.com/app/10/CS/"
        );
    }

    #[test]
    fn price_formats() {
        assert_eq!(parse_price("$19.99"), Some(19.99));
        assert_eq!(parse_price("NT$ 318"), Some(318.0));
        assert_eq!(parse_price("19,99€"), Some(19.99));
        assert_eq!(parse_price("1.234,56€"), Some(1234.56));
        assert_eq!(parse_price("₩ 21,500"), Some(21500.0));
        assert_eq!(parse_price("Free"), None);
    }
}
