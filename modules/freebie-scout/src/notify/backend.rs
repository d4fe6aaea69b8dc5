use std::time::Duration;

use async_trait::async_trait;

use freebie_common::{GameDeal, RunMode};

/// What the startup announcement reports.
#[derive(Debug, Clone)]
pub struct StartupInfo {
    pub check_interval: Duration,
    pub run_mode: RunMode,
}

/// Pluggable notification backend for the scout.
#[async_trait]
pub trait NotifyBackend: Send + Sync {
    /// Announce a single free game.
    async fn send_deal(&self, deal: &GameDeal) -> anyhow::Result<()>;

    /// Announce that the scout has started.
    async fn send_startup(&self, info: &StartupInfo) -> anyhow::Result<()>;
}
