use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use discord_webhook::{
    Delivery, Embed, EmbedField, EmbedFooter, EmbedImage, WebhookClient, WebhookMessage,
};
use freebie_common::{GameDeal, RunMode};
use steam_store_client::header_image_url;

use super::backend::{NotifyBackend, StartupInfo};

const DEAL_COLOR: u32 = 0x00ff00;
const STARTUP_COLOR: u32 = 0x3498db;

/// Discord incoming webhook notification backend.
pub struct DiscordBackend {
    client: WebhookClient,
}

impl DiscordBackend {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            client: WebhookClient::new(webhook_url),
        }
    }
}

#[async_trait]
impl NotifyBackend for DiscordBackend {
    async fn send_deal(&self, deal: &GameDeal) -> anyhow::Result<()> {
        let message = deal_message(deal, Utc::now());

        match self.client.execute(&message).await? {
            Delivery::Delivered => {
                info!(key = deal.key(), name = %deal.name, "Notification sent");
            }
            delivery @ Delivery::Retried { .. } if delivery.is_delivered() => {
                info!(key = deal.key(), name = %deal.name, "Notification sent after rate-limit retry");
            }
            Delivery::Retried { status, .. } => {
                anyhow::bail!("Webhook retry after rate limit returned {status}");
            }
        }

        Ok(())
    }

    async fn send_startup(&self, info: &StartupInfo) -> anyhow::Result<()> {
        self.client.execute(&startup_message(info, Utc::now())).await?;
        Ok(())
    }
}

/// Header image for the embed: the source's own image, else the CDN header
/// for a numeric Steam app id, else none.
pub fn resolve_header_image(deal: &GameDeal) -> Option<String> {
    deal.header_image
        .clone()
        .filter(|url| !url.is_empty())
        .or_else(|| deal.steam_app_id().map(header_image_url))
}

pub fn price_text(original_price: f64) -> String {
    if original_price.is_finite() && original_price > 0.0 {
        format!("~~${original_price:.2}~~ → **FREE**")
    } else {
        "**FREE**".to_string()
    }
}

pub fn deal_message(deal: &GameDeal, now: DateTime<Utc>) -> WebhookMessage {
    let url = Some(deal.url.clone()).filter(|u| !u.is_empty());

    WebhookMessage::embed(Embed {
        title: Some(format!("🎮  {}", deal.name)),
        url,
        description: Some(
            "This game is currently **100% off**. Free to keep for a limited time!\nGrab it on Steam before the offer ends."
                .to_string(),
        ),
        color: Some(DEAL_COLOR),
        fields: vec![
            EmbedField {
                name: "💰 Price".to_string(),
                value: price_text(deal.original_price),
                inline: true,
            },
            EmbedField {
                name: "🔗 Link".to_string(),
                value: format!("[Open in Steam]({})", deal.url),
                inline: true,
            },
        ],
        image: resolve_header_image(deal).map(|url| EmbedImage { url }),
        footer: Some(EmbedFooter {
            text: format!("Steam freebie alert • {}", now.format("%Y/%m/%d %H:%M UTC")),
        }),
    })
}

pub fn startup_message(info: &StartupInfo, now: DateTime<Utc>) -> WebhookMessage {
    let description = match info.run_mode {
        RunMode::Continuous => format!(
            "Checking Steam for free games every {} minutes",
            info.check_interval.as_secs() / 60
        ),
        RunMode::Once => "Running a single check for free Steam games".to_string(),
    };

    WebhookMessage::embed(Embed {
        title: Some("🤖 Steam freebie scout started".to_string()),
        description: Some(description),
        color: Some(STARTUP_COLOR),
        footer: Some(EmbedFooter {
            text: now.format("%Y/%m/%d %H:%M:%S UTC").to_string(),
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap()
    }

    #[test]
    fn price_text_strikes_positive_prices() {
        assert_eq!(price_text(19.99), "~~$19.99~~ → **FREE**");
        assert_eq!(price_text(5.0), "~~$5.00~~ → **FREE**");
        assert_eq!(price_text(0.0), "**FREE**");
        assert_eq!(price_text(-1.0), "**FREE**");
    }

    #[test]
    fn header_image_prefers_source_image() {
        let deal = GameDeal::new(Some("620".into()), "Portal 2", 9.99, "u")
            .with_header_image("https://cdn/custom.jpg");
        assert_eq!(
            resolve_header_image(&deal).as_deref(),
            Some("https://cdn/custom.jpg")
        );
    }

    #[test]
    fn header_image_synthesized_from_app_id() {
        let deal = GameDeal::new(Some("620".into()), "Portal 2", 9.99, "u");
        assert_eq!(
            resolve_header_image(&deal).as_deref(),
            Some("https://cdn.cloudflare.steamstatic.com/steam/apps/620/header.jpg")
        );
    }

    #[test]
    fn header_image_omitted_for_non_steam_ids() {
        let itad = GameDeal::new(Some("018d937f-abc".into()), "A", 0.0, "u");
        let none = GameDeal::new(None, "B", 0.0, "u");
        assert!(resolve_header_image(&itad).is_none());
        assert!(resolve_header_image(&none).is_none());
    }

    #[test]
    fn deal_message_shape() {
        let deal = GameDeal::new(
            Some("620".into()),
            "Portal 2",
            9.99,
            "https://store.steampowered.com/app/620",
        );
        let value = serde_json::to_value(deal_message(&deal, now())).unwrap();
        let embed = &value["embeds"][0];

        assert_eq!(embed["title"], "🎮  Portal 2");
        assert_eq!(embed["url"], "https://store.steampowered.com/app/620");
        assert_eq!(embed["color"], 0x00ff00);
        assert_eq!(embed["fields"][0]["value"], "~~$9.99~~ → **FREE**");
        assert_eq!(
            embed["fields"][1]["value"],
            "[Open in Steam](https://store.steampowered.com/app/620)"
        );
        assert_eq!(
            embed["image"],
            json!({ "url": "https://cdn.cloudflare.steamstatic.com/steam/apps/620/header.jpg" })
        );
        assert_eq!(embed["footer"]["text"], "Steam freebie alert • 2026/10/18 09:05 UTC");
    }

    #[test]
    fn deal_message_without_image_omits_it() {
        let deal = GameDeal::new(None, "Mystery", 0.0, "https://example.test/");
        let value = serde_json::to_value(deal_message(&deal, now())).unwrap();
        assert!(value["embeds"][0].get("image").is_none());
        assert_eq!(value["embeds"][0]["fields"][0]["value"], "**FREE**");
    }

    #[test]
    fn startup_message_mentions_interval() {
        let info = StartupInfo {
            check_interval: Duration::from_secs(1800),
            run_mode: RunMode::Continuous,
        };
        let value = serde_json::to_value(startup_message(&info, now())).unwrap();
        assert_eq!(
            value["embeds"][0]["description"],
            "Checking Steam for free games every 30 minutes"
        );
        assert_eq!(value["embeds"][0]["color"], 0x3498db);
    }
}
