// Rhyme lookup seam and a timeout wrapper for slow sources.
//
// `RhymeSource` is what the rhyme scheme optimizer queries on a cache miss.
// Unknown words are not an error: a source answers `Ok(vec![])`. Only
// transport-level trouble (a remote dictionary service being down, a lookup
// that never returns) is reported as `RhymeSourceError`, and the optimizer's
// cache degrades those to an empty rhyme group.
//
// `TimeoutRhymeSource` bounds a lookup's wall-clock time. Lookups are handed
// to a fixed pool of long-lived worker threads over a bounded job queue; the
// caller waits for the reply with `recv_timeout`. A timed-out lookup keeps
// its worker busy until the backend answers, and its answer is dropped.
//
// A backend that hangs can tie up at most the pool plus the queue. Once both
// are full, further lookups fail straight away with `Unavailable` rather than
// piling up more work. No thread is spawned after construction.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, RecvTimeoutError, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Default wait for a single rhyme lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Worker threads per `TimeoutRhymeSource`, absent an explicit pool size.
pub const DEFAULT_LOOKUP_WORKERS: usize = 2;

/// Lookups that may wait for a free worker before new ones are refused.
pub const DEFAULT_LOOKUP_QUEUE: usize = 8;

/// Transport-level failure of a rhyme source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RhymeSourceError {
    #[error("rhyme source unavailable: {0}")]
    Unavailable(String),

    #[error("rhyme lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Anything that can list the words rhyming with a seed word.
pub trait RhymeSource {
    /// Words rhyming with `word` (expected lowercase). Empty for unknown
    /// words.
    fn rhymes_for(&self, word: &str) -> Result<Vec<String>, RhymeSourceError>;
}

impl<S: RhymeSource + ?Sized> RhymeSource for &S {
    fn rhymes_for(&self, word: &str) -> Result<Vec<String>, RhymeSourceError> {
        (**self).rhymes_for(word)
    }
}

impl<S: RhymeSource + ?Sized> RhymeSource for Arc<S> {
    fn rhymes_for(&self, word: &str) -> Result<Vec<String>, RhymeSourceError> {
        (**self).rhymes_for(word)
    }
}

type LookupResult = Result<Vec<String>, RhymeSourceError>;

/// One queued lookup and where to send its answer.
struct LookupJob {
    word: String,
    reply: mpsc::Sender<LookupResult>,
}

/// Wraps a source so that no lookup blocks longer than `timeout`.
#[derive(Debug)]
pub struct TimeoutRhymeSource<S> {
    inner: Arc<S>,
    jobs: mpsc::SyncSender<LookupJob>,
    timeout: Duration,
    workers: usize,
}

impl<S> TimeoutRhymeSource<S>
where
    S: RhymeSource + Send + Sync + 'static,
{
    /// Wrap `inner` with the default pool size and queue depth.
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self::with_pool(inner, timeout, DEFAULT_LOOKUP_WORKERS, DEFAULT_LOOKUP_QUEUE)
    }

    /// Wrap with `DEFAULT_LOOKUP_TIMEOUT`.
    pub fn with_default_timeout(inner: S) -> Self {
        Self::new(inner, DEFAULT_LOOKUP_TIMEOUT)
    }

    /// Wrap `inner`, serving lookups from `workers` threads (at least one)
    /// with room for `queue_depth` waiting lookups.
    pub fn with_pool(inner: S, timeout: Duration, workers: usize, queue_depth: usize) -> Self {
        let inner = Arc::new(inner);
        let workers = workers.max(1);
        let (jobs, queue) = mpsc::sync_channel(queue_depth);
        let queue = Arc::new(Mutex::new(queue));
        for _ in 0..workers {
            spawn_worker(Arc::clone(&inner), Arc::clone(&queue));
        }
        Self {
            inner,
            jobs,
            timeout,
            workers,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Serve jobs until every sender is gone. A panicking lookup is answered
/// with `Unavailable` and the worker carries on.
fn spawn_worker<S>(inner: Arc<S>, queue: Arc<Mutex<mpsc::Receiver<LookupJob>>>)
where
    S: RhymeSource + Send + Sync + 'static,
{
    thread::spawn(move || {
        loop {
            let next = queue.lock().unwrap_or_else(PoisonError::into_inner).recv();
            let Ok(job) = next else {
                break;
            };
            let result = catch_unwind(AssertUnwindSafe(|| inner.rhymes_for(&job.word)))
                .unwrap_or_else(|_| {
                    Err(RhymeSourceError::Unavailable("rhyme source panicked".into()))
                });
            // The caller has gone if it already timed out.
            let _ = job.reply.send(result);
        }
    });
}

impl<S> RhymeSource for TimeoutRhymeSource<S>
where
    S: RhymeSource + Send + Sync + 'static,
{
    fn rhymes_for(&self, word: &str) -> Result<Vec<String>, RhymeSourceError> {
        let (reply, answer) = mpsc::channel();
        let job = LookupJob {
            word: word.to_owned(),
            reply,
        };
        match self.jobs.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                return Err(RhymeSourceError::Unavailable(
                    "all rhyme lookup workers are busy".into(),
                ));
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(RhymeSourceError::Unavailable(
                    "rhyme lookup workers have exited".into(),
                ));
            }
        }

        match answer.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(RhymeSourceError::Timeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(RhymeSourceError::Unavailable(
                "rhyme lookup worker exited without answering".into(),
            )),
        }
    }
}
