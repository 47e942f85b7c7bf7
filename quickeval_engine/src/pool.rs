//! Fixed-size worker pool.
//!
//! Jobs are boxed closures sent over an unbounded crossbeam channel; each worker
//! thread pulls the next job until the channel closes. There is no cancellation
//! and no backpressure. A panicking job is logged and the worker keeps going.
//! Dropping the pool closes the channel and joins every worker.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error};
use quickeval_common::{EvalError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pool of worker threads executing submitted jobs in FIFO order.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one).
    pub fn new(size: usize) -> Result<Self> {
        let (sender, receiver) = unbounded::<Job>();
        let workers = (0..size.max(1))
            .map(|id| {
                let receiver = receiver.clone();
                thread::Builder::new()
                    .name(format!("quickeval-worker-{}", id))
                    .spawn(move || worker_loop(id, receiver))
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        debug!("Worker pool started with {} threads", workers.len());
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for the next free worker.
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.sender {
            Some(sender) => Ok(sender.send(Box::new(job))?),
            None => Err(EvalError::ChannelSend("worker pool is shut down".to_string())),
        }
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>) {
    for job in receiver.iter() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("Worker {} recovered from a panicking job", id);
        }
    }
    debug!("Worker {} stopping", id);
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("Worker thread panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_job_before_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(3).unwrap();
            assert_eq!(pool.size(), 3);
            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn survives_panicking_jobs() {
        let (tx, rx) = unbounded();
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(|| panic!("boom")).unwrap();
        pool.execute(move || tx.send(42).unwrap()).unwrap();
        assert_eq!(rx.recv().unwrap(), 42);
    }

    #[test]
    fn zero_size_still_gets_a_worker() {
        assert_eq!(WorkerPool::new(0).unwrap().size(), 1);
    }
}
