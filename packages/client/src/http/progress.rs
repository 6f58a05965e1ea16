//! Transfer progress snapshots

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Direction of a reported transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upload,
    Download,
}

/// One progress snapshot handed to `on_upload_progress` / `on_download_progress`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Bytes transferred so far.
    pub loaded: u64,
    /// Expected total, when the peer announced it.
    pub total: Option<u64>,
    /// `loaded / total`, when the total is known.
    pub progress: Option<f64>,
    /// Bytes transferred since the previous snapshot.
    pub bytes: u64,
    /// Bytes per second since the transfer started.
    pub rate: Option<f64>,
    /// Estimated seconds until completion.
    pub estimated: Option<f64>,
    pub direction: Direction,
}

/// Progress listener.
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Accumulates transferred byte counts into [`ProgressEvent`] snapshots.
#[derive(Debug)]
pub struct ProgressTracker {
    direction: Direction,
    total: Option<u64>,
    loaded: u64,
    started: Instant,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(direction: Direction, total: Option<u64>) -> Self {
        ProgressTracker {
            direction,
            total,
            loaded: 0,
            started: Instant::now(),
        }
    }

    /// Record `bytes` more transferred bytes and return the new snapshot.
    pub fn advance(&mut self, bytes: u64) -> ProgressEvent {
        self.loaded += bytes;
        self.snapshot(bytes, self.started.elapsed())
    }

    fn snapshot(&self, bytes: u64, elapsed: Duration) -> ProgressEvent {
        let seconds = elapsed.as_secs_f64();
        let rate = (seconds > 0.0).then(|| self.loaded as f64 / seconds);
        let progress = self
            .total
            .filter(|total| *total > 0)
            .map(|total| self.loaded as f64 / total as f64);
        let estimated = match (rate, self.total) {
            (Some(rate), Some(total)) if rate > 0.0 && total >= self.loaded => {
                Some((total - self.loaded) as f64 / rate)
            }
            _ => None,
        };
        ProgressEvent {
            loaded: self.loaded,
            total: self.total,
            progress,
            bytes,
            rate,
            estimated,
            direction: self.direction,
        }
    }
}
