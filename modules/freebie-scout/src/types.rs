use std::fmt;

use crate::sources::SourceReport;

/// Per-source outcome of one cycle.
#[derive(Debug, Clone)]
pub struct SourceStats {
    pub source: &'static str,
    pub deals: usize,
    pub failed: bool,
}

/// Stats from one polling cycle.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub sources: Vec<SourceStats>,
    pub candidates: usize,
    pub new_deals: usize,
    pub notify_failures: usize,
}

impl CycleStats {
    pub fn from_reports(reports: &[SourceReport]) -> Self {
        Self {
            sources: reports
                .iter()
                .map(|r| SourceStats {
                    source: r.source,
                    deals: r.deals.len(),
                    failed: r.error.is_some(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn sources_failed(&self) -> usize {
        self.sources.iter().filter(|s| s.failed).count()
    }
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_source: Vec<String> = self
            .sources
            .iter()
            .map(|s| {
                if s.failed {
                    format!("{}=failed", s.source)
                } else {
                    format!("{}={}", s.source, s.deals)
                }
            })
            .collect();
        write!(
            f,
            "candidates={} new_deals={} notify_failures={} sources({})",
            self.candidates,
            self.new_deals,
            self.notify_failures,
            per_source.join(" "),
        )
    }
}
