//! Load driver
//!
//! `min(C, N)` workers pull attempt indices from a shared counter until all N
//! have been claimed, so at most C requests are ever in flight and exactly N
//! are dispatched. Outcomes flow back through a bounded channel in completion
//! order.

use futures::Stream;
use gauntlet_core::{Outcome, RunConfig, SetupError};
use gauntlet_http::{RequestExecutor, RequestSpec};
use gauntlet_resilience::ShutdownListener;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace};

/// Outcomes buffered between workers and the consumer, per worker
const CHANNEL_SLOTS_PER_WORKER: usize = 4;

/// Runs one request template N times at concurrency C
#[derive(Clone)]
pub struct LoadDriver {
    executor: Arc<dyn RequestExecutor>,
    shutdown: ShutdownListener,
}

impl LoadDriver {
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            shutdown: ShutdownListener::never(),
        }
    }

    /// Abandon in-flight requests once `listener` fires
    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.shutdown = listener;
        self
    }

    /// Start the run. Workers are spawned on the current tokio runtime.
    pub fn execute(
        &self,
        spec: Arc<RequestSpec>,
        config: RunConfig,
    ) -> Result<OutcomeStream, SetupError> {
        config.validate()?;

        let workers = config.effective_concurrency();
        let (tx, rx) = mpsc::channel(workers.saturating_mul(CHANNEL_SLOTS_PER_WORKER));
        let progress = Arc::new(RunProgress::new(config.requests));

        debug!(
            "Dispatching {} x {} with {} workers",
            config.requests, spec, workers
        );

        let handles = (0..workers)
            .map(|worker_id| {
                let worker = Worker {
                    id: worker_id,
                    executor: Arc::clone(&self.executor),
                    spec: Arc::clone(&spec),
                    timeout: config.request_timeout,
                    progress: Arc::clone(&progress),
                    shutdown: self.shutdown.clone(),
                    tx: tx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Ok(OutcomeStream {
            inner: ReceiverStream::new(rx),
            progress,
            shutdown: self.shutdown.clone(),
            handles,
        })
    }
}

/// Shared counters of one run
#[derive(Debug)]
struct RunProgress {
    requested: u64,
    next_index: AtomicU64,
    completed: AtomicU64,
    started_at: Instant,
    last_completion_nanos: AtomicU64,
}

impl RunProgress {
    fn new(requested: u64) -> Self {
        Self {
            requested,
            next_index: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            started_at: Instant::now(),
            last_completion_nanos: AtomicU64::new(0),
        }
    }

    /// Claim the next attempt, or `None` once all N are taken
    fn claim(&self) -> Option<u64> {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        (index < self.requested).then_some(index)
    }

    fn record_completion(&self) {
        let nanos = u64::try_from(self.started_at.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last_completion_nanos.fetch_max(nanos, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    fn wall_clock(&self) -> Duration {
        Duration::from_nanos(self.last_completion_nanos.load(Ordering::Relaxed))
    }
}

struct Worker {
    id: usize,
    executor: Arc<dyn RequestExecutor>,
    spec: Arc<RequestSpec>,
    timeout: Duration,
    progress: Arc<RunProgress>,
    shutdown: ShutdownListener,
    tx: mpsc::Sender<Outcome>,
}

impl Worker {
    async fn run(mut self) {
        let mut executed = 0u64;

        while !self.shutdown.is_triggered() {
            let Some(index) = self.progress.claim() else {
                break;
            };

            let outcome = tokio::select! {
                biased;
                _ = self.shutdown.triggered() => {
                    trace!("Worker {} abandoned attempt {}", self.id, index);
                    break;
                }
                outcome = self.executor.execute(&self.spec, self.timeout) => outcome,
            };

            self.progress.record_completion();
            executed += 1;

            if self.tx.send(outcome).await.is_err() {
                debug!("Outcome consumer dropped, worker {} stopping", self.id);
                break;
            }
        }

        trace!("Worker {} finished after {} requests", self.id, executed);
    }
}

/// What the driver did, available once the stream is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverReport {
    pub requested: u64,
    pub completed: u64,
    pub cancelled: bool,
    /// First dispatch to last completion; zero if nothing completed
    pub wall_clock: Duration,
}

/// Finite stream of the outcomes of one run.
///
/// Yields exactly `requested` items unless the run is cancelled.
pub struct OutcomeStream {
    inner: ReceiverStream<Outcome>,
    progress: Arc<RunProgress>,
    shutdown: ShutdownListener,
    handles: Vec<JoinHandle<()>>,
}

impl OutcomeStream {
    /// Snapshot of the run's counters.
    ///
    /// Final once the stream has returned `None`.
    pub fn report(&self) -> DriverReport {
        let completed = self.progress.completed.load(Ordering::Relaxed);
        DriverReport {
            requested: self.progress.requested,
            completed,
            cancelled: self.shutdown.is_triggered() && completed < self.progress.requested,
            wall_clock: self.progress.wall_clock(),
        }
    }
}

impl Stream for OutcomeStream {
    type Item = Outcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for OutcomeStream {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
