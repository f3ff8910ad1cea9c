//! Rate gate bounding how many submissions may start per rolling window.
//!
//! The gate holds `limit` permits. Every admission consumes one permit and a
//! background release task returns it exactly `interval` after the moment it
//! was consumed. Permit *i* is therefore checked out over
//! `[t_i, t_i + interval)`, so no trailing window of length `interval` ever
//! contains more than `limit` admissions.
//!
//! This is a fixed-delay approximation of a sliding window, not a token
//! bucket: there is no burst beyond `limit` and no refill rate.

use crate::domain::time_unit::TimeUnit;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Error returned when gate configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateConfigError {
    /// Interval duration must be greater than zero
    #[error("gate interval must be greater than 0")]
    ZeroInterval,
    /// Interval is longer than the gate can schedule a release for
    #[error("gate interval {interval:?} exceeds the maximum of {max:?}")]
    IntervalTooLarge {
        /// Requested interval
        interval: Duration,
        /// Longest supported interval
        max: Duration,
    },
    /// Limit must be greater than zero
    #[error("gate limit must be greater than 0")]
    ZeroLimit,
    /// Limit exceeds what the underlying semaphore can hold
    #[error("gate limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge {
        /// Requested limit
        limit: usize,
        /// Largest supported limit
        max: usize,
    },
}

/// Configuration of a [`RateGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    interval: Duration,
    limit: usize,
}

impl GateConfig {
    /// Longest accepted interval: 365 days.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    /// Allow at most `limit` admissions in any trailing `interval`.
    ///
    /// # Errors
    /// Returns `GateConfigError` if `interval` is zero or longer than
    /// [`MAX_INTERVAL`](Self::MAX_INTERVAL), or if `limit` is zero or too large.
    pub fn new(interval: Duration, limit: usize) -> Result<Self, GateConfigError> {
        if interval.is_zero() {
            return Err(GateConfigError::ZeroInterval);
        }
        if interval > Self::MAX_INTERVAL {
            return Err(GateConfigError::IntervalTooLarge {
                interval,
                max: Self::MAX_INTERVAL,
            });
        }
        if limit == 0 {
            return Err(GateConfigError::ZeroLimit);
        }
        if limit > Semaphore::MAX_PERMITS {
            return Err(GateConfigError::LimitTooLarge {
                limit,
                max: Semaphore::MAX_PERMITS,
            });
        }
        Ok(Self { interval, limit })
    }

    /// Allow at most `limit` admissions per one `unit` of time.
    ///
    /// # Errors
    /// Same as [`GateConfig::new`].
    pub fn per_unit(unit: TimeUnit, limit: usize) -> Result<Self, GateConfigError> {
        Self::new(unit.one(), limit)
    }

    /// Length of the rolling window.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Maximum admissions per window.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Error returned when the gate does not admit a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The wait was cancelled or timed out before a permit became available
    #[error("rate gate wait was interrupted")]
    Interrupted,
    /// The gate has been shut down
    #[error("rate gate is shut down")]
    Closed,
}

/// Error returned when the release task fails to shut down cleanly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShutdownError {
    /// The release task panicked before it could be stopped
    #[error("rate gate release task panicked")]
    TaskPanicked,
}

/// Proof that one permit was consumed.
///
/// An admission authorises exactly one submission; it is neither `Clone`
/// nor `Copy`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an admission authorises exactly one submission"]
pub struct Admission {
    admitted_at: Instant,
    release_at: Instant,
}

impl Admission {
    /// When the permit was consumed.
    pub fn admitted_at(&self) -> Instant {
        self.admitted_at
    }

    /// When the permit returns to the gate.
    pub fn release_at(&self) -> Instant {
        self.release_at
    }
}

#[derive(Debug)]
struct ReleaseTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Admits at most `limit` submission starts per rolling `interval`.
///
/// Waiters are admitted in FIFO order. The gate is `Send + Sync`; share it
/// with an `Arc`.
///
/// # Example
/// ```
/// use registry_throttle::{GateConfig, RateGate};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gate = RateGate::new(GateConfig::new(Duration::from_secs(1), 2).unwrap());
///
/// let _first = gate.acquire().await.unwrap();
/// let _second = gate.acquire().await.unwrap();
/// assert_eq!(gate.available_permits(), 0);
///
/// gate.shutdown().await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct RateGate {
    config: GateConfig,
    permits: Arc<Semaphore>,
    // Unbounded is fine: every queued release holds a consumed permit, so at
    // most `limit` entries are ever outstanding.
    releases: mpsc::UnboundedSender<Instant>,
    release_task: Mutex<Option<ReleaseTask>>,
}

impl RateGate {
    /// Create a gate with `limit` permits available and start its release task.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn new(config: GateConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.limit));
        let (releases, release_rx) = mpsc::unbounded_channel();
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run_releases(Arc::clone(&permits), release_rx, stop_rx));

        tracing::debug!(
            limit = config.limit,
            interval = ?config.interval,
            "rate gate started"
        );

        Self {
            config,
            permits,
            releases,
            release_task: Mutex::new(Some(ReleaseTask { stop, handle })),
        }
    }

    /// Wait for a permit, consume it and schedule its return.
    ///
    /// Waits indefinitely while the gate is saturated. Dropping the returned
    /// future while it waits consumes nothing.
    ///
    /// # Errors
    /// Returns `GateError::Closed` if the gate has been shut down.
    pub async fn acquire(&self) -> Result<Admission, GateError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GateError::Closed)?;
        let admitted_at = Instant::now();
        let release_at = admitted_at + self.config.interval;
        // Returned by the release task, not on drop.
        permit.forget();

        if self.releases.send(release_at).is_err() {
            return Err(GateError::Closed);
        }

        tracing::debug!(
            available = self.permits.available_permits(),
            release_in = ?self.config.interval,
            "rate gate admission granted"
        );

        Ok(Admission {
            admitted_at,
            release_at,
        })
    }

    /// Like [`acquire`](Self::acquire), but give up when `cancel` completes first.
    ///
    /// A permit that is already available wins over a cancel signal that is
    /// already complete.
    ///
    /// # Errors
    /// Returns `GateError::Interrupted` if `cancel` fires before admission, in
    /// which case no permit is consumed. Returns `GateError::Closed` if the
    /// gate has been shut down.
    pub async fn acquire_until<F>(&self, cancel: F) -> Result<Admission, GateError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            admission = self.acquire() => admission,
            _ = cancel => {
                tracing::debug!("rate gate wait interrupted");
                Err(GateError::Interrupted)
            }
        }
    }

    /// Like [`acquire`](Self::acquire), but wait at most `wait`.
    ///
    /// # Errors
    /// Same as [`acquire_until`](Self::acquire_until).
    pub async fn acquire_timeout(&self, wait: Duration) -> Result<Admission, GateError> {
        self.acquire_until(tokio::time::sleep(wait)).await
    }

    /// Number of permits that can be consumed right now.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Gate configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Close the gate and stop the release task.
    ///
    /// Pending and future `acquire` calls fail with `GateError::Closed`.
    /// Scheduled releases are cancelled, so no permit is returned after this
    /// call. Calling it again is a no-op.
    ///
    /// # Errors
    /// Returns `ShutdownError::TaskPanicked` if the release task panicked.
    pub async fn shutdown(&self) -> Result<(), ShutdownError> {
        self.permits.close();

        let Some(ReleaseTask { stop, handle }) = self.take_release_task() else {
            return Ok(());
        };
        // The task may already have exited; nothing to signal then.
        let _ = stop.send(());

        match handle.await {
            Ok(()) => {
                tracing::info!("rate gate shut down");
                Ok(())
            }
            Err(e) if e.is_cancelled() => Ok(()),
            Err(_) => Err(ShutdownError::TaskPanicked),
        }
    }

    fn take_release_task(&self) -> Option<ReleaseTask> {
        self.release_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Drop for RateGate {
    fn drop(&mut self) {
        if let Some(task) = self.take_release_task() {
            task.handle.abort();
        }
    }
}

/// Return permits in the order their releases were scheduled.
///
/// Two callers admitted microseconds apart may enqueue out of order; the
/// earlier release then fires slightly late, never early.
async fn run_releases(
    permits: Arc<Semaphore>,
    mut releases: mpsc::UnboundedReceiver<Instant>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        let release_at = tokio::select! {
            biased;
            _ = &mut stop => break,
            next = releases.recv() => match next {
                Some(release_at) => release_at,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = &mut stop => break,
            _ = sleep_until(release_at) => {
                permits.add_permits(1);
                tracing::trace!(available = permits.available_permits(), "permit released");
            }
        }
    }
}
