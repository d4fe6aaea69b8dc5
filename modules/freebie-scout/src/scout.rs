use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use freebie_common::{FreebieConfig, RunMode};

use crate::merge::merge_deals;
use crate::notify::{NotifyBackend, StartupInfo};
use crate::seen::SeenStore;
use crate::sources::{fetch_all, DealSource};
use crate::types::CycleStats;

/// The polling loop: fetch every source, merge, notify what is new, persist.
pub struct Scout {
    sources: Vec<Box<dyn DealSource>>,
    notifier: Box<dyn NotifyBackend>,
    seen: SeenStore,
    run_mode: RunMode,
    check_interval: Duration,
    notify_delay: Duration,
}

impl Scout {
    /// `sources` must be in merge priority order, richest first.
    pub fn new(
        config: &FreebieConfig,
        sources: Vec<Box<dyn DealSource>>,
        notifier: Box<dyn NotifyBackend>,
        seen: SeenStore,
    ) -> Self {
        Self {
            sources,
            notifier,
            seen,
            run_mode: config.run_mode,
            check_interval: config.check_interval,
            notify_delay: config.notify_delay,
        }
    }

    pub fn seen(&self) -> &SeenStore {
        &self.seen
    }

    /// Prune the seen-set, announce startup, then cycle until one-shot mode
    /// says stop. Returns only in one-shot mode or on a persistence error.
    pub async fn run(&mut self) -> Result<()> {
        let pruned = self.seen.prune(Utc::now());
        info!(
            pruned,
            remaining = self.seen.len(),
            "Pruned seen-set entries older than retention window"
        );

        let startup = StartupInfo {
            check_interval: self.check_interval,
            run_mode: self.run_mode,
        };
        if let Err(e) = self.notifier.send_startup(&startup).await {
            debug!(error = %e, "Startup notification failed");
        }

        loop {
            info!("Checking for free games...");
            let stats = self.run_cycle(Utc::now()).await?;

            if stats.new_deals == 0 {
                info!("No new free games. {stats}");
            } else {
                info!(new_deals = stats.new_deals, "Cycle complete. {stats}");
            }

            if self.run_mode == RunMode::Once {
                info!("One-shot mode: cycle finished, exiting");
                return Ok(());
            }

            info!(
                minutes = self.check_interval.as_secs() / 60,
                "Next check scheduled"
            );
            tokio::time::sleep(self.check_interval).await;
        }
    }

    /// One polling cycle. Source and notification failures are absorbed;
    /// only failing to persist the seen-set is an error.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<CycleStats> {
        let reports = fetch_all(&self.sources).await;
        let mut stats = CycleStats::from_reports(&reports);

        let candidates = merge_deals(reports.into_iter().flat_map(|r| r.deals));
        stats.candidates = candidates.len();

        for (key, deal) in candidates {
            if self.seen.contains(&key) {
                continue;
            }

            // Marked seen even when delivery fails; it will not be retried.
            if let Err(e) = self.notifier.send_deal(&deal).await {
                warn!(key = key.as_str(), name = %deal.name, error = %e, "Failed to send notification");
                stats.notify_failures += 1;
            }
            self.seen.record(&key, &deal.name, now);
            stats.new_deals += 1;

            if !self.notify_delay.is_zero() {
                tokio::time::sleep(self.notify_delay).await;
            }
        }

        self.seen.save().with_context(|| {
            format!("Failed to persist seen-set to {}", self.seen.path().display())
        })?;

        Ok(stats)
    }
}
