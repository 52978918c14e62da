//! Worker pool for the fan-out half of an audit run.
//!
//! Spawns N persistent tokio tasks that pull work items from an
//! async-channel. Each item is processed on the blocking thread pool, since
//! the work is file I/O and hashing. Results go to an unbounded channel with
//! a single consumer.
//!
//! `async-channel` is used for work distribution because its `Receiver` is
//! `Clone`: each worker owns a handle and no `Mutex` is needed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks that process items concurrently.
///
/// Every submitted item yields exactly one result. A run has no timeout and
/// no cancellation: the pool drains its whole input before [`recv`] returns
/// `None`.
///
/// # Example
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, paths, move |path| audit_one(&path));
///
/// while let Some(result) = pool.recv().await {
///     ledger.apply(result);
/// }
/// ```
///
/// [`recv`]: Self::recv
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers (at least one), submit all items, and return a pool
    /// for receiving results.
    ///
    /// The work channel is sized to hold the whole batch, so submission
    /// never waits on the consumer. Results are unbounded for the same
    /// reason.
    pub fn start<W, F>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> R + Send + Sync + 'static,
    {
        let n = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(items.len().max(1));
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        for item in items {
            // Capacity is the batch size and `work_rx` is still alive
            if work_tx.try_send(item).is_err() {
                log::error!("Worker pool: work queue rejected an item");
            }
        }
        // Closing the sender lets workers exit once the queue is drained
        drop(work_tx);

        log::debug!("Initializing {n} workers");
        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|id| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    log::debug!("Worker {id} starting");
                    while let Ok(item) = work_rx.recv().await {
                        let process_fn = process_fn.clone();
                        match tokio::task::spawn_blocking(move || process_fn(item)).await {
                            Ok(r) => {
                                if result_tx.send(r).is_err() {
                                    break; // Receiver dropped
                                }
                            }
                            Err(e) => log::error!("Worker {id}: task failed: {e}"),
                        }
                    }
                    log::debug!("Worker {id} exiting");
                })
            })
            .collect();

        // Drop our copy of result_tx so the channel closes when all workers finish
        drop(result_tx);

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Receive the next result. Returns `None` when all items have been
    /// processed and all workers have shut down.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }
}

#[cfg(test)]
#[path = "tests/worker_pool_tests.rs"]
mod tests;
