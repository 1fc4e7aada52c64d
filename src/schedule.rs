//! One-shot deferred work with cancellable handles.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::trace;

use crate::Result;

/// Cancellable token for a scheduled task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct TimerHandle {
    label: &'static str,
    abort: AbortHandle,
}

impl TimerHandle {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }

    /// Cancels the task if it has not run yet.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if !self.abort.is_finished() {
            trace!(timer = self.label, "timer cancelled");
            self.abort.abort();
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    runtime: Handle,
}

impl Scheduler {
    #[must_use]
    pub const fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Binds to the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// Runs `task` once after `delay`, unless the returned handle is cancelled first.
    pub fn after<F>(&self, delay: Duration, label: &'static str, task: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(label, async move {
            sleep(delay).await;
            task.await;
        })
    }

    /// Runs `task` right away as a cancellable background job.
    pub fn spawn<F>(&self, label: &'static str, task: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let join = self.runtime.spawn(task);
        TimerHandle {
            label,
            abort: join.abort_handle(),
        }
    }
}
