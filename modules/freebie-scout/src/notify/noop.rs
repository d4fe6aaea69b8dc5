use async_trait::async_trait;
use tracing::info;

use freebie_common::GameDeal;

use super::backend::{NotifyBackend, StartupInfo};

/// Used when no webhook is configured: logs and drops every message.
pub struct NoopBackend;

#[async_trait]
impl NotifyBackend for NoopBackend {
    async fn send_deal(&self, deal: &GameDeal) -> anyhow::Result<()> {
        info!(key = deal.key(), name = %deal.name, "No webhook configured, skipping notification");
        Ok(())
    }

    async fn send_startup(&self, _info: &StartupInfo) -> anyhow::Result<()> {
        info!("No webhook configured, skipping startup notification");
        Ok(())
    }
}
