//! Bounded worker pool
//!
//! `size` tokio tasks pull items from one shared queue and push each job's
//! output through an mpsc channel to the collector. Results arrive in
//! completion order, not input order.
//!
//! [`WorkerPool::run`] gathers every output. [`WorkerPool::try_run`] stops
//! handing out queued items at the first `Err`, lets in-flight jobs finish,
//! and returns that error.

use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// A worker task died instead of finishing its queue
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerFailure {
    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker was aborted")]
    Aborted,
}

impl From<JoinError> for WorkerFailure {
    fn from(err: JoinError) -> Self {
        if !err.is_panic() {
            return WorkerFailure::Aborted;
        }
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        WorkerFailure::Panicked(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Pool with `size` workers (at least one)
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// One worker per logical CPU
    pub fn for_host() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` on every item and gather all outputs
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, job: F) -> Result<Vec<R>, WorkerFailure>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (outputs, failure) = self.execute(items, job, |_: &R| false).await;
        match failure {
            Some(failure) => Err(failure),
            None => Ok(outputs),
        }
    }

    /// Run `job` on every item, stopping at the first error
    ///
    /// Items already handed to a worker still complete; queued items are
    /// never started once an error has been seen.
    pub async fn try_run<T, R, E, F, Fut>(&self, items: Vec<T>, job: F) -> Result<Vec<R>, E>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: From<WorkerFailure> + Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        let (outputs, failure) = self
            .execute(items, job, |output: &Result<R, E>| output.is_err())
            .await;

        let mut values = Vec::with_capacity(outputs.len());
        for output in outputs {
            values.push(output?);
        }
        if let Some(failure) = failure {
            return Err(failure.into());
        }
        Ok(values)
    }

    async fn execute<T, O, F, Fut, S>(&self, items: Vec<T>, job: F, stop_on: S) -> (Vec<O>, Option<WorkerFailure>)
    where
        T: Send + 'static,
        O: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        S: Fn(&O) -> bool,
    {
        let total = items.len();
        let queue = Arc::new(Mutex::new(items.into_iter()));
        let job = Arc::new(job);
        let cancel_token = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel::<O>(self.size * 2);

        let mut workers = JoinSet::new();
        for worker_id in 0..self.size.min(total.max(1)) {
            let queue = Arc::clone(&queue);
            let job = Arc::clone(&job);
            let tx = tx.clone();
            let cancel_token = cancel_token.clone();

            workers.spawn(async move {
                loop {
                    if cancel_token.is_cancelled() {
                        debug!(worker_id, "Worker stopping after cancellation");
                        break;
                    }

                    // Lock is released before the job is awaited
                    let next = queue.lock().unwrap_or_else(|p| p.into_inner()).next();
                    let Some(item) = next else {
                        break;
                    };

                    let output = job(item).await;
                    if tx.send(output).await.is_err() {
                        break;
                    }
                }
            });
        }
        // Channel closes once every worker has dropped its sender
        drop(tx);

        let mut outputs = Vec::with_capacity(total);
        while let Some(output) = rx.recv().await {
            if stop_on(&output) && !cancel_token.is_cancelled() {
                debug!("Stopping worker pool after failed job");
                cancel_token.cancel();
            }
            outputs.push(output);
        }

        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                let worker_failure = WorkerFailure::from(e);
                error!(error = %worker_failure, "Worker task failed");
                failure.get_or_insert(worker_failure);
            }
        }

        (outputs, failure)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::for_host()
    }
}
