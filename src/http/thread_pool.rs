//! Fixed-size thread pool
//!
//! Saturation policy: jobs beyond the worker count wait in an unbounded FIFO
//! queue. Nothing is rejected. Dropping the pool closes the queue; workers
//! drain what is already queued and then exit on their own.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use thiserror::Error;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The pool can no longer take work
#[derive(Debug, Error)]
#[error("worker pool is shut down")]
pub struct PoolClosed;

/// Thread pool for handling connections
pub struct ThreadPool {
    // Never joined: shutdown must not wait on a slow client
    workers: Vec<thread::JoinHandle<()>>,
    sender: mpsc::Sender<Job>,
}

impl ThreadPool {
    /// Create new thread pool with `size` named workers
    pub fn new(size: usize, name: &str) -> io::Result<Self> {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| spawn_worker(id, name, Arc::clone(&receiver)))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self { workers, sender })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for the next free worker
    pub fn execute<F>(&self, f: F) -> Result<(), PoolClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.send(Box::new(f)).map_err(|_| PoolClosed)
    }
}

fn spawn_worker(
    id: usize,
    name: &str,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("{name}-worker-{id}"))
        .spawn(move || {
            loop {
                // Guard dropped before the job runs
                let job = match receiver.lock() {
                    Ok(rx) => rx.recv(),
                    Err(poisoned) => poisoned.into_inner().recv(),
                };

                let Ok(job) = job else { break };

                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!(worker = id, "connection handler panicked");
                }
            }
            debug!(worker = id, "queue closed, worker exiting");
        })
}
