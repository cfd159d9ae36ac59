//! Queued units of work and their completion handles.

use crate::error::{ErrorKind, Result};
use crossbeam_channel::{Receiver, TryRecvError, bounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// A type-erased task as stored in the queue.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Completion handle returned by [`WorkerPool::submit`](crate::WorkerPool::submit).
///
/// Dropping the handle does not cancel the task; an accepted task always runs.
#[must_use = "dropping a handle does not cancel the task, but its outcome is lost"]
pub struct TaskHandle<T> {
    receiver: Receiver<std::thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run, returning its value.
    ///
    /// A panic inside the task is reported as [`ErrorKind::TaskPanicked`]
    /// rather than being propagated into the waiting thread.
    pub fn wait(self) -> Result<T> {
        match self.receiver.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => exn::bail!(ErrorKind::TaskPanicked(panic_message(payload.as_ref()))),
            Err(_) => exn::bail!(ErrorKind::Disconnected),
        }
    }

    /// Non-blocking variant of [`wait`](Self::wait). Gives the handle back
    /// when the task has not finished yet.
    pub fn try_wait(self) -> std::result::Result<Result<T>, Self> {
        match self.receiver.try_recv() {
            Ok(Ok(value)) => Ok(Ok(value)),
            Ok(Err(payload)) => Ok(Err(exn::Exn::from(ErrorKind::TaskPanicked(panic_message(payload.as_ref()))))),
            Err(TryRecvError::Disconnected) => Ok(Err(exn::Exn::from(ErrorKind::Disconnected))),
            Err(TryRecvError::Empty) => Err(self),
        }
    }
}

/// Wrap a closure into a queueable [`Job`] plus the handle that observes it.
///
/// The job catches any panic from the closure so the worker that runs it
/// keeps draining the queue.
pub(crate) fn package<F, T>(task: F) -> (Job, TaskHandle<T>)
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = bounded(1);
    let job: Job = Box::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(task));
        // Fire-and-forget submitters drop the handle; nobody to tell.
        let _ = sender.send(outcome);
    });
    (job, TaskHandle { receiver })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
