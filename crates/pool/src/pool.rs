use crate::error::{ErrorKind, Result};
use crate::task::{self, Job, TaskHandle};
use exn::ResultExt;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Number of workers used when a pool is constructed with zero threads.
///
/// Falls back to a single worker when the platform cannot report its
/// available parallelism.
pub fn default_parallelism() -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// Queue state; `stopped` lives under the same lock as `tasks` so that a
/// submission racing [`WorkerPool::stop`] is either queued before the flag
/// flips (and therefore executed) or rejected.
struct Queue {
    tasks: VecDeque<Job>,
    stopped: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}
impl Shared {
    /// Jobs run outside the lock and contain their own panics, so the mutex
    /// is never poisoned mid-update. Recover the guard either way.
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A fixed-size set of worker threads draining a shared FIFO queue.
///
/// Workers start as soon as the pool is constructed. Once [`stop`](Self::stop)
/// has been called, [`submit`](Self::submit) fails with
/// [`ErrorKind::Stopped`], but everything queued before that point still
/// runs. Dropping the pool (or calling [`join`](Self::join)) stops it and
/// waits for every worker to exit, so all accepted tasks have completed by
/// the time it returns.
///
/// # Examples
///
/// ```
/// use hashscan_pool::WorkerPool;
///
/// let pool = WorkerPool::new(2).unwrap();
/// let handle = pool.submit(|| 6 * 7).unwrap();
/// assert_eq!(handle.wait().unwrap(), 42);
/// pool.join();
/// ```
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool of `threads` workers; `0` means [`default_parallelism`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Spawn`] if a worker thread cannot be started.
    /// Workers spawned before the failure are stopped and joined.
    pub fn new(threads: usize) -> Result<Self> {
        let threads = match threads {
            0 => default_parallelism(),
            n => n,
        };
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                stopped: false,
            }),
            available: Condvar::new(),
        });
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(threads),
        };
        for id in 0..threads {
            let shared = Arc::clone(&pool.shared);
            // Early return drops `pool`, which joins the workers spawned so far.
            let worker = thread::Builder::new()
                .name(format!("hashscan-worker-{id}"))
                .spawn(move || work(id, &shared))
                .or_raise(|| ErrorKind::Spawn)?;
            pool.workers.push(worker);
        }
        tracing::debug!(workers = threads, "Worker pool started");
        Ok(pool)
    }

    /// Number of worker threads in the pool.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.lock().stopped
    }

    /// Queue a task at the tail and wake one idle worker.
    ///
    /// An accepted task runs exactly once. The returned [`TaskHandle`] yields
    /// its value; it can be dropped for fire-and-forget work.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Stopped`] if [`stop`](Self::stop) has already
    /// been called.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (job, handle) = task::package(task);
        {
            let mut queue = self.shared.lock();
            if queue.stopped {
                exn::bail!(ErrorKind::Stopped);
            }
            queue.tasks.push_back(job);
        }
        self.shared.available.notify_one();
        Ok(handle)
    }

    /// Stop accepting work and wake every worker so they drain the queue and
    /// exit. Idempotent; does not wait for the workers.
    pub fn stop(&self) {
        {
            let mut queue = self.shared.lock();
            if queue.stopped {
                return;
            }
            queue.stopped = true;
        }
        self.shared.available.notify_all();
        tracing::debug!("Worker pool stopping");
    }

    /// Stop the pool and block until every queued task has run and every
    /// worker has exited. Equivalent to dropping the pool.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        for worker in self.workers.drain(..) {
            // Jobs catch their own panics; this only fires on a bug in `work`.
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked outside of a task");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn work(id: usize, shared: &Shared) {
    tracing::trace!(worker = id, "Worker started");
    loop {
        let job = {
            let mut queue = shared.lock();
            loop {
                // Pop before checking the flag: stopping drains, it doesn't cancel.
                if let Some(job) = queue.tasks.pop_front() {
                    break Some(job);
                }
                if queue.stopped {
                    break None;
                }
                queue = shared.available.wait(queue).unwrap_or_else(PoisonError::into_inner);
            }
        };
        match job {
            Some(job) => job(),
            None => break,
        }
    }
    tracing::trace!(worker = id, "Worker exiting");
}
