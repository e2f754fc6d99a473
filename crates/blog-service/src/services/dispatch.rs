//! Background notification workers
//!
//! A bounded queue of saved comments drained by a fixed number of Tokio tasks.
//! Submitting never blocks: when the queue is full the oldest job is dropped.
//! Delivery failures are logged here and never reach the request that saved
//! the comment.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blog_core::Comment;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationDispatcher;

/// Worker pool sizing
#[derive(Debug, Clone, Copy)]
pub struct WorkerPoolConfig {
    pub workers: usize,
    pub capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            capacity: 1024,
        }
    }
}

#[derive(Debug)]
struct Job {
    id: Uuid,
    comment: Comment,
}

/// FIFO that evicts its oldest entry instead of growing past `capacity`
#[derive(Debug)]
struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    capacity: usize,
    in_flight: AtomicUsize,
}

impl JobQueue {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            jobs: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Enqueue `job`, returning the job evicted to make room
    fn push(&self, job: Job) -> Option<Job> {
        let mut jobs = self.jobs.lock();
        let evicted = if jobs.len() >= self.capacity {
            jobs.pop_front()
        } else {
            None
        };
        jobs.push_back(job);
        evicted
    }

    /// Take the next job, counting it as in flight until [`JobQueue::finish`]
    fn take(&self) -> Option<Job> {
        let mut jobs = self.jobs.lock();
        let job = jobs.pop_front()?;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        Some(job)
    }

    fn finish(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn clear(&self) -> usize {
        let mut jobs = self.jobs.lock();
        let abandoned = jobs.len();
        jobs.clear();
        abandoned
    }

    fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    fn is_idle(&self) -> bool {
        let jobs = self.jobs.lock();
        jobs.is_empty() && self.in_flight.load(Ordering::SeqCst) == 0
    }
}

/// Counters exposed for health output and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPoolStats {
    pub pending: usize,
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

struct Shared {
    queue: JobQueue,
    ready: Notify,
    closed: AtomicBool,
    counters: Counters,
    dispatcher: Arc<NotificationDispatcher>,
}

/// Fixed set of Tokio tasks delivering comment notifications
pub struct NotificationWorkerPool {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl NotificationWorkerPool {
    /// Spawn the workers on the current Tokio runtime
    pub fn start(
        dispatcher: Arc<NotificationDispatcher>,
        config: WorkerPoolConfig,
    ) -> ServiceResult<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            ServiceError::internal("notification workers must be started inside a Tokio runtime")
        })?;

        let shared = Arc::new(Shared {
            queue: JobQueue::new(config.capacity),
            ready: Notify::new(),
            closed: AtomicBool::new(false),
            counters: Counters::default(),
            dispatcher,
        });

        let workers = config.workers.max(1);
        let handles = (0..workers)
            .map(|worker| runtime.spawn(run_worker(worker, shared.clone())))
            .collect();

        info!(
            workers,
            capacity = shared.queue.capacity,
            "Notification workers started"
        );

        Ok(Self {
            shared,
            handles: Mutex::new(handles),
        })
    }

    /// Queue `comment` for notification.
    ///
    /// Returns `false` once the pool is shut down.
    pub fn submit(&self, comment: Comment) -> bool {
        if self.shared.closed.load(Ordering::SeqCst) {
            warn!(comment_id = comment.id, "Notification pool closed, job discarded");
            return false;
        }

        let job = Job {
            id: Uuid::new_v4(),
            comment,
        };
        debug!(job_id = %job.id, comment_id = job.comment.id, "Notification queued");

        if let Some(evicted) = self.shared.queue.push(job) {
            self.shared.counters.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(
                job_id = %evicted.id,
                comment_id = evicted.comment.id,
                capacity = self.shared.queue.capacity,
                "Notification queue full, dropped oldest job"
            );
        }

        self.shared.ready.notify_one();
        true
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> WorkerPoolStats {
        let counters = &self.shared.counters;
        WorkerPoolStats {
            pending: self.pending(),
            delivered: counters.delivered.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Wait until nothing is queued or in flight, up to `timeout`
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.shared.queue.is_idle() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Stop accepting jobs, abandon queued ones and wait up to `timeout` for
    /// in-flight deliveries before aborting the workers.
    pub async fn shutdown(&self, timeout: Duration) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let abandoned = self.shared.queue.clear();
        if abandoned > 0 {
            warn!(abandoned, "Notification jobs abandoned at shutdown");
        }
        self.shared.ready.notify_waiters();

        let handles = std::mem::take(&mut *self.handles.lock());
        let deadline = Instant::now() + timeout;
        for mut handle in handles {
            if tokio::time::timeout_at(deadline, &mut handle).await.is_err() {
                warn!("Notification worker did not stop in time, aborting");
                handle.abort();
            }
        }

        info!("Notification workers stopped");
    }
}

impl std::fmt::Debug for NotificationWorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationWorkerPool")
            .field("stats", &self.stats())
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn run_worker(worker: usize, shared: Arc<Shared>) {
    debug!(worker, "Notification worker running");

    loop {
        // Register interest before checking the queue so a submit in between is not missed
        let notified = shared.ready.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if shared.closed.load(Ordering::SeqCst) {
            break;
        }

        let Some(job) = shared.queue.take() else {
            notified.await;
            continue;
        };

        deliver(worker, &shared, job).await;
        shared.queue.finish();
    }

    debug!(worker, "Notification worker exiting");
}

async fn deliver(worker: usize, shared: &Shared, job: Job) {
    match shared.dispatcher.notify(&job.comment).await {
        Ok(email) => {
            shared.counters.delivered.fetch_add(1, Ordering::Relaxed);
            info!(
                worker,
                job_id = %job.id,
                comment_id = job.comment.id,
                subject = %email.subject,
                "Notification delivered"
            );
        }
        Err(e) if e.is_store_unavailable() => {
            shared.counters.failed.fetch_add(1, Ordering::Relaxed);
            error!(
                worker,
                job_id = %job.id,
                comment_id = job.comment.id,
                error = %e,
                "Notification delivery failed"
            );
        }
        Err(e) => {
            shared.counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                worker,
                job_id = %job.id,
                comment_id = job.comment.id,
                error = %e,
                "Notification skipped"
            );
        }
    }
}
