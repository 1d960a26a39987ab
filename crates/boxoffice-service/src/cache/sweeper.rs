//! Background expiry sweeper.
//!
//! Reads already ignore expired entries; the sweeper exists to reclaim the
//! memory they hold. Each namespace has its own cadence and each tick only
//! touches that namespace's partition.

use super::{CacheInterface, CacheMetrics, Namespace};
use boxoffice_config::CacheConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Sweep cadence for each namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepIntervals {
    pub events: Duration,
    pub users: Duration,
    pub bookings: Duration,
}

impl SweepIntervals {
    /// The same cadence for every namespace.
    #[must_use]
    pub const fn uniform(every: Duration) -> Self {
        Self {
            events: every,
            users: every,
            bookings: every,
        }
    }
}

impl From<&CacheConfig> for SweepIntervals {
    fn from(config: &CacheConfig) -> Self {
        Self {
            events: config.events.sweep_interval(),
            users: config.users.sweep_interval(),
            bookings: config.bookings.sweep_interval(),
        }
    }
}

/// Periodically purges expired entries from a store.
pub struct ExpirySweeper {
    store: Arc<dyn CacheInterface>,
    intervals: SweepIntervals,
}

impl ExpirySweeper {
    #[must_use]
    pub fn new(store: Arc<dyn CacheInterface>, intervals: SweepIntervals) -> Self {
        Self { store, intervals }
    }

    /// Starts the sweep loop on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let running = Arc::new(AtomicBool::new(true));

        info!(
            events_secs = self.intervals.events.as_secs(),
            users_secs = self.intervals.users.as_secs(),
            bookings_secs = self.intervals.bookings.as_secs(),
            "Starting cache expiry sweeper"
        );

        let task = tokio::spawn(self.run(shutdown_rx, Arc::clone(&running)));

        SweeperHandle {
            shutdown_tx,
            running,
            task,
        }
    }

    async fn run(self, mut shutdown_rx: broadcast::Receiver<()>, running: Arc<AtomicBool>) {
        let mut events = ticker(self.intervals.events);
        let mut users = ticker(self.intervals.users);
        let mut bookings = ticker(self.intervals.bookings);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Cache expiry sweeper received shutdown signal");
                    break;
                }
                _ = events.tick() => self.sweep(Namespace::Events).await,
                _ = users.tick() => self.sweep(Namespace::Users).await,
                _ = bookings.tick() => self.sweep(Namespace::Bookings).await,
            }
        }

        running.store(false, Ordering::SeqCst);
    }

    async fn sweep(&self, namespace: Namespace) {
        match self.store.purge_expired(namespace).await {
            Ok(0) => {}
            Ok(removed) => debug!(%namespace, removed, "Swept expired cache entries"),
            Err(e) => warn!(%namespace, error = %e, "Cache sweep failed"),
        }
        CacheMetrics::snapshot(namespace, &self.store.stats(namespace));
    }
}

fn ticker(period: Duration) -> Interval {
    // Skip the immediate first tick; nothing can have expired at startup.
    let mut ticks = match Instant::now().checked_add(period) {
        Some(start) => interval_at(start, period),
        None => interval(period),
    };
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticks
}

/// Handle to a running sweeper.
pub struct SweeperHandle {
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Whether the sweep loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signals the sweep loop to stop and waits for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            warn!(error = %e, "Cache expiry sweeper task ended abnormally");
        }
        info!("Cache expiry sweeper stopped");
    }
}
