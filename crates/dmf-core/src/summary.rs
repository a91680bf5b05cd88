//! Run summary: per-outcome counts, bytes transferred and failures.

use crate::fetch::FetchOutcome;
use crate::item::{DepotId, ManifestId, ResolvedItem};
use std::time::{Duration, Instant};

/// One item that exhausted its attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub depot: DepotId,
    pub manifest: ManifestId,
    pub error: String,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    /// In the order items were fetched.
    pub failed: Vec<FailedItem>,
    /// Bytes downloaded in this run (skipped files not included).
    pub bytes_downloaded: u64,
    /// Bytes of files that were already present.
    pub bytes_skipped: u64,
    /// Depots with no public manifest; not part of any count above.
    pub unresolved: Vec<DepotId>,
    started: Instant,
    elapsed: Option<Duration>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            downloaded: 0,
            skipped: 0,
            failed: Vec::new(),
            bytes_downloaded: 0,
            bytes_skipped: 0,
            unresolved: Vec::new(),
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Folds one item's outcome into the totals.
    pub fn record(&mut self, item: &ResolvedItem, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            FetchOutcome::Skipped { bytes } => {
                self.skipped += 1;
                self.bytes_skipped += bytes;
            }
            FetchOutcome::Failed { error, attempts } => self.failed.push(FailedItem {
                depot: item.depot.clone(),
                manifest: item.manifest.clone(),
                error: error.clone(),
                attempts: *attempts,
            }),
        }
    }

    /// Freezes the elapsed time. Later calls keep the first value.
    pub fn finish(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(self.started.elapsed());
        }
    }

    /// Elapsed time: frozen if `finish` was called, running otherwise.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Items that went through the fetch stage.
    pub fn processed(&self) -> usize {
        self.downloaded + self.skipped + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Average download rate in bytes per second (0 if nothing was downloaded).
    pub fn bytes_per_sec(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.bytes_downloaded as f64 / secs
    }
}
