//! Fixed-size worker thread pool.
//!
//! A [`WorkerPool`] owns N OS threads that block on a shared FIFO queue
//! (a mutex plus a condition variable) and run one task at a time. The
//! lifecycle is deliberately simple:
//!
//! - threads start in [`WorkerPool::new`];
//! - [`WorkerPool::submit`] queues work from any thread and hands back a
//!   [`TaskHandle`];
//! - [`WorkerPool::stop`] rejects further submissions but lets the queue
//!   drain;
//! - dropping the pool (or [`WorkerPool::join`]) stops it and joins every
//!   worker.
//!
//! There is no cancellation, timeout, or backpressure: a task that never
//! returns occupies its worker forever, and the queue is unbounded.

pub mod error;
mod pool;
mod task;

pub use crate::pool::{WorkerPool, default_parallelism};
pub use crate::task::TaskHandle;
