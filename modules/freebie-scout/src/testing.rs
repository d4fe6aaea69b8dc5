// Test doubles for the scout loop.
//
// - MockSource (DealSource): canned deals or a canned failure
// - RecordingNotifier (NotifyBackend): records what would have been sent,
//   optionally failing every delivery
//
// Both hand out shared handles so a test can inspect them after the scout
// has taken ownership of the boxed trait objects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;

use freebie_common::GameDeal;

use crate::notify::{NotifyBackend, StartupInfo};
use crate::sources::{DealSource, SourceError};

/// Shorthand for a deal with just an id and a name.
pub fn deal(id: Option<&str>, name: &str) -> GameDeal {
    let url = match id {
        Some(id) => format!("https://store.steampowered.com/app/{id}"),
        None => format!("https://store.steampowered.com/search/?term={name}"),
    };
    GameDeal::new(id.map(String::from), name, 0.0, url)
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

pub struct MockSource {
    name: &'static str,
    result: Result<Vec<GameDeal>, String>,
    calls: Arc<AtomicUsize>,
}

impl MockSource {
    pub fn returning(name: &'static str, deals: Vec<GameDeal>) -> Self {
        Self {
            name,
            result: Ok(deals),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &'static str, reason: &str) -> Self {
        Self {
            name,
            result: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `fetch` has been called.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl DealSource for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self) -> Result<Vec<GameDeal>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(deals) => Ok(deals.clone()),
            Err(reason) => Err(SourceError::Transport(reason.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<GameDeal>>>,
    startups: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send records the attempt and then fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<GameDeal> {
        self.sent.lock().unwrap().clone()
    }

    pub fn startups(&self) -> usize {
        self.startups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotifyBackend for RecordingNotifier {
    async fn send_deal(&self, deal: &GameDeal) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(deal.clone());
        if self.fail {
            bail!("webhook unavailable");
        }
        Ok(())
    }

    async fn send_startup(&self, _info: &StartupInfo) -> anyhow::Result<()> {
        self.startups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("webhook unavailable");
        }
        Ok(())
    }
}
