//! Periodic job status poller.
//!
//! The poller mirrors the service's job list into local state: an immediate
//! fetch on start, then one fetch per interval, plus on-demand refreshes
//! after submissions. The local list is a cache replaced wholesale by each
//! successful fetch (service order preserved, jobs absent from a snapshot
//! simply disappear). Fetch failures leave the list untouched and are only
//! logged; the next scheduled tick is the retry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};
use vedit_models::JobRecord;

use crate::service::JobServiceClient;

/// State shared between the poller handle and its background task.
struct PollerShared {
    /// Last successfully fetched job list, in service order
    jobs: Vec<JobRecord>,
    /// Sequence number of the most recently applied fetch
    applied_seq: u64,
    /// Bumped on stop; a fetch only applies if its epoch is still current
    epoch: u64,
}

/// Handle owning the recurring fetch task.
///
/// Dropping the handle aborts the schedule; independent pollers can coexist,
/// each owns its own timer and list.
pub struct JobPoller {
    service: Arc<JobServiceClient>,
    poll_interval: Duration,
    shared: Arc<Mutex<PollerShared>>,
    next_seq: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl JobPoller {
    /// Create a poller for the given service; does not start fetching.
    pub fn new(service: Arc<JobServiceClient>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
            shared: Arc::new(Mutex::new(PollerShared {
                jobs: Vec::new(),
                applied_seq: 0,
                epoch: 0,
            })),
            next_seq: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Begin polling: one immediate fetch, then one per interval.
    ///
    /// Idempotent; calling while already running leaves the existing
    /// schedule in place.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("poller already running");
            return;
        }

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let next_seq = Arc::clone(&self.next_seq);
        let epoch = shared.lock().await.epoch;
        let period = self.poll_interval;

        info!(interval = ?period, "starting job poller");

        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                // First tick fires immediately.
                ticker.tick().await;
                let seq = next_seq.fetch_add(1, Ordering::SeqCst) + 1;
                Self::fetch_once(&service, &shared, seq, epoch).await;
            }
        }));
    }

    /// Cancel the recurring schedule. Safe to call repeatedly.
    ///
    /// An in-flight fetch is not interrupted mid-transit, but its result is
    /// discarded: the epoch is bumped before the task is aborted, so a late
    /// response cannot resurrect state after teardown.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        self.shared.lock().await.epoch += 1;
        if let Some(handle) = task.take() {
            handle.abort();
            info!("job poller stopped");
        }
    }

    /// Whether the recurring schedule is active.
    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Perform one fetch immediately, independent of the schedule.
    ///
    /// Used to get a fast update right after a submission. Failures are
    /// swallowed here exactly as on the scheduled path.
    pub async fn refresh_now(&self) {
        let epoch = self.shared.lock().await.epoch;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        Self::fetch_once(&self.service, &self.shared, seq, epoch).await;
    }

    /// Snapshot of the current job list, in service order.
    pub async fn jobs(&self) -> Vec<JobRecord> {
        self.shared.lock().await.jobs.clone()
    }

    /// Fetch the job list and apply it if the result is still relevant.
    ///
    /// A response is applied only when its epoch is current (the poller has
    /// not been stopped since the fetch was issued) and its sequence number
    /// exceeds the highest applied so far, so a slow stale response never
    /// overwrites a fresher list.
    async fn fetch_once(
        service: &JobServiceClient,
        shared: &Mutex<PollerShared>,
        seq: u64,
        epoch: u64,
    ) {
        match service.list_jobs().await {
            Ok(jobs) => {
                let mut state = shared.lock().await;
                if state.epoch != epoch {
                    debug!(seq, "discarding fetch result after stop");
                    return;
                }
                if seq <= state.applied_seq {
                    debug!(
                        seq,
                        applied = state.applied_seq,
                        "discarding stale fetch result"
                    );
                    return;
                }
                debug!(seq, count = jobs.len(), "applying job list snapshot");
                state.applied_seq = seq;
                state.jobs = jobs;
            }
            Err(e) => {
                // Polling is resilient to transient backend unavailability;
                // local state stays as it was.
                warn!(seq, "job list refresh failed: {}", e);
            }
        }
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.try_lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
