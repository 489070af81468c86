use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::task::TaskTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Draining,
    Stopped,
}

/// Owns the process lifecycle and every unit of background work spawned by
/// request handlers.
///
/// Background work registered while `Running` or `Draining` is awaited
/// before the coordinator reports `Stopped`. Registration after `Stopped`
/// is refused.
pub struct ShutdownCoordinator {
    state: watch::Sender<LifecycleState>,
    tracker: TaskTracker,
    drain_timeout: Duration,
}

impl ShutdownCoordinator {
    /// # Arguments
    /// * `drain_timeout` - Upper bound on the listener's graceful stop
    pub fn new(drain_timeout: Duration) -> Self {
        let (state, _) = watch::channel(LifecycleState::Running);
        Self {
            state,
            tracker: TaskTracker::new(),
            drain_timeout,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// Number of registered background units still running.
    pub fn pending_background(&self) -> usize {
        self.tracker.len()
    }

    /// Register a unit of fire-and-forget work.
    ///
    /// # Returns
    /// `false` when the coordinator has already stopped and the work was
    /// dropped without running
    pub fn spawn_background<F>(&self, name: &'static str, work: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // The read guard keeps `finish` from flipping to Stopped between the
        // check and the spawn.
        let state = self.state.borrow();
        if *state == LifecycleState::Stopped {
            tracing::warn!(task = name, "Background task refused after shutdown");
            return false;
        }

        self.tracker.spawn(async move {
            match tokio::spawn(work).await {
                Ok(()) => tracing::debug!(task = name, "Background task finished"),
                Err(e) if e.is_panic() => {
                    tracing::error!(task = name, error = %e, "Background task panicked")
                }
                Err(e) => tracing::warn!(task = name, error = %e, "Background task cancelled"),
            }
        });
        drop(state);

        true
    }

    /// Move from `Running` to `Draining`. Returns whether this call made the
    /// transition.
    pub fn begin_drain(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == LifecycleState::Running {
                *state = LifecycleState::Draining;
                true
            } else {
                false
            }
        })
    }

    /// Resolves once the coordinator has left `Running`.
    pub fn draining(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.state.subscribe();
        async move {
            let _ = receiver
                .wait_for(|state| *state != LifecycleState::Running)
                .await;
        }
    }

    /// Wait for every registered background unit, then mark `Stopped`.
    ///
    /// There is no upper bound on this wait.
    pub async fn finish(&self) {
        self.begin_drain();
        self.tracker.close();

        loop {
            self.tracker.wait().await;

            let stopped = self.state.send_if_modified(|state| {
                if self.tracker.is_empty() {
                    *state = LifecycleState::Stopped;
                    true
                } else {
                    false
                }
            });
            if stopped {
                break;
            }
        }

        tracing::info!("Background tasks completed");
    }
}
