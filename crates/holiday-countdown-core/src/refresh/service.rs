//! Background refresh coordination.
//!
//! `HolidayService` owns the refresh lifecycle: it runs refreshes on spawned
//! tokio tasks, keeps at most one in flight, reports every outcome to the
//! injected `Reporter`, and arms the retry timer when a refresh fails.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::NearestHoliday;
use crate::presentation::Reporter;

use super::{RefreshError, Refresher, RetryPolicy};

/// Outcome shared by everyone waiting on the same refresh.
pub type RefreshOutcome = Result<Option<NearestHoliday>, Arc<RefreshError>>;

/// What the service tells its reporter after each refresh.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// The refresh finished; `None` means no upcoming off-day is known.
    Updated(Option<NearestHoliday>),
    /// The refresh failed. `retry_in` is set when a retry has been scheduled.
    Failed {
        error: Arc<RefreshError>,
        retry_in: Option<Duration>,
    },
}

/// A cloneable handle to a running (or finished) refresh.
#[derive(Clone)]
pub struct RefreshHandle {
    outcome: Shared<BoxFuture<'static, RefreshOutcome>>,
}

impl RefreshHandle {
    /// Wait for the refresh to finish.
    pub async fn wait(self) -> RefreshOutcome {
        self.outcome.await
    }
}

struct PendingRetry {
    id: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct ServiceState {
    in_flight: Option<RefreshHandle>,
    pending_retry: Option<PendingRetry>,
    next_retry_id: u64,
    failed_attempts: u32,
}

struct ServiceInner {
    refresher: Arc<Refresher>,
    reporter: Arc<dyn Reporter>,
    retry: RetryPolicy,
    state: Mutex<ServiceState>,
}

/// Single-flight refresh runner. Cheap to clone.
///
/// Methods that start work spawn tokio tasks and must be called from within a
/// tokio runtime.
#[derive(Clone)]
pub struct HolidayService {
    inner: Arc<ServiceInner>,
}

impl HolidayService {
    pub fn new(refresher: Refresher, reporter: Arc<dyn Reporter>, retry: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                refresher: Arc::new(refresher),
                reporter,
                retry,
                state: Mutex::new(ServiceState::default()),
            }),
        }
    }

    /// Start a refresh, or join the one already running.
    ///
    /// Cancels any scheduled retry and resets the retry attempt count.
    pub fn refresh(&self) -> RefreshHandle {
        let mut state = self.inner.lock_state();
        if let Some(pending) = state.pending_retry.take() {
            debug!("Cancelling scheduled retry for manual refresh");
            pending.task.abort();
        }
        state.failed_attempts = 0;
        ServiceInner::start(&self.inner, &mut state)
    }

    /// Cancel a scheduled retry. Returns whether one was pending.
    pub fn cancel_retry(&self) -> bool {
        match self.inner.lock_state().pending_retry.take() {
            Some(pending) => {
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.lock_state().in_flight.is_some()
    }

    pub fn retry_pending(&self) -> bool {
        self.inner.lock_state().pending_retry.is_some()
    }
}

impl ServiceInner {
    fn lock_state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(inner: &Arc<Self>, state: &mut ServiceState) -> RefreshHandle {
        if let Some(handle) = &state.in_flight {
            debug!("Refresh already in flight, joining it");
            return handle.clone();
        }

        let service = Arc::clone(inner);
        let task = tokio::spawn(async move { service.execute().await });
        let outcome = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(Arc::new(RefreshError::Worker(e.to_string()))),
            }
        }
        .boxed()
        .shared();

        let handle = RefreshHandle { outcome };
        state.in_flight = Some(handle.clone());
        handle
    }

    async fn execute(self: Arc<Self>) -> RefreshOutcome {
        info!("Starting background holiday refresh");

        // The routine runs on its own task so a panic surfaces as a failure
        // instead of leaving the in-flight slot occupied.
        let refresher = Arc::clone(&self.refresher);
        let outcome = match tokio::spawn(async move { refresher.run().await }).await {
            Ok(result) => result.map_err(Arc::new),
            Err(e) => Err(Arc::new(RefreshError::Worker(e.to_string()))),
        };

        let event = self.finish(&outcome);
        self.reporter.report(event);
        outcome
    }

    fn finish(self: &Arc<Self>, outcome: &RefreshOutcome) -> RefreshEvent {
        let mut state = self.lock_state();
        state.in_flight = None;

        match outcome {
            Ok(nearest) => {
                state.failed_attempts = 0;
                RefreshEvent::Updated(nearest.clone())
            }
            Err(error) => {
                state.failed_attempts += 1;
                let retry_in = self.retry.delay_for(state.failed_attempts);
                match retry_in {
                    Some(delay) => {
                        info!(
                            attempt = state.failed_attempts,
                            delay_secs = delay.as_secs(),
                            "Scheduling holiday refresh retry"
                        );
                        let id = state.next_retry_id;
                        state.next_retry_id += 1;
                        let task = self.schedule_retry(id, delay);
                        state.pending_retry = Some(PendingRetry { id, task });
                    }
                    None if self.retry.is_enabled() => {
                        warn!(attempts = state.failed_attempts, "Holiday refresh retries exhausted");
                    }
                    None => {}
                }
                RefreshEvent::Failed {
                    error: Arc::clone(error),
                    retry_in,
                }
            }
        }
    }

    fn schedule_retry(self: &Arc<Self>, id: u64, delay: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut state = service.lock_state();
            if state.pending_retry.as_ref().map(|pending| pending.id) != Some(id) {
                return;
            }
            state.pending_retry = None;
            info!("Retrying holiday refresh");
            ServiceInner::start(&service, &mut state);
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
