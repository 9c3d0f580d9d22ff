use std::time::Duration;

use super::dispatch::DataStore;
use super::tree::TreeStore;

/// Cached snapshot of the [`DataStore`] with a simulated load latency.
///
/// The first [`Self::poll`] starts a fetch. After a mutation the dispatcher calls
/// [`Self::invalidate`]; the fresh snapshot is taken from the store once the latency has elapsed,
/// so it contains every mutation applied up to that moment. Times are egui input time (seconds).
#[derive(Debug)]
pub struct DataQuery {
    latency_secs: f64,
    data: Option<TreeStore>,
    fetch_ready_at: Option<f64>,
    generation: u64,
}

impl DataQuery {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency_secs: latency.as_secs_f64(),
            data: None,
            fetch_ready_at: None,
            generation: 0,
        }
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency_secs = latency.as_secs_f64();
    }

    /// The last delivered snapshot, `None` before the first load completes.
    pub fn data(&self) -> Option<&TreeStore> {
        self.data.as_ref()
    }

    /// Bumped on every delivered snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_ready_at.is_some()
    }

    /// Seconds until the in-flight fetch completes.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.fetch_ready_at.map(|ready_at| (ready_at - now).max(0.0))
    }

    /// Mark the snapshot stale. An already running fetch keeps its schedule.
    pub fn invalidate(&mut self, now: f64) {
        if self.fetch_ready_at.is_none() {
            log::debug!("query invalidated");
            self.fetch_ready_at = Some(now + self.latency_secs);
        }
    }

    /// Drive the fetch. Returns `true` when a new snapshot was delivered.
    pub fn poll(&mut self, now: f64, store: &dyn DataStore) -> bool {
        if self.data.is_none() && self.fetch_ready_at.is_none() {
            self.fetch_ready_at = Some(now + self.latency_secs);
        }
        match self.fetch_ready_at {
            Some(ready_at) if now >= ready_at => {
                self.fetch_ready_at = None;
                self.data = Some(store.snapshot());
                self.generation += 1;
                log::debug!("query delivered snapshot #{}", self.generation);
                true
            }
            _ => false,
        }
    }
}
