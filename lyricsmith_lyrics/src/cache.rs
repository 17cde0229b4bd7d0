// Memoizing rhyme cache in front of a `RhymeSource`.
//
// Keys are lowercased seed words. A key goes from absent to populated on its
// first successful lookup and stays populated for the cache's lifetime; there
// is no eviction and no staleness handling. Empty results are cached like any
// other. Source errors are logged and answered with an empty group, but are
// not cached, so a later lookup of the same word retries the source.
//
// The cache is shared across threads (`RwLock` + atomics) so one optimizer
// can serve a rayon batch. Two threads missing the same key at once both
// query the source; results for a key are deterministic, so the duplicate
// call only costs time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use lyricsmith_phonetics::RhymeSource;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

/// A rhyme group as stored in the cache.
pub type RhymeGroup = Arc<[String]>;

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct RhymeCache<S> {
    source: S,
    entries: RwLock<FxHashMap<String, RhymeGroup>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: RhymeSource> RhymeCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Rhyme group for `word`, from cache or the source.
    pub fn lookup(&self, word: &str) -> RhymeGroup {
        let key = word.to_lowercase();

        if let Some(group) = self.cached(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return group;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.source.rhymes_for(&key) {
            Ok(words) => {
                debug!(word = %key, rhymes = words.len(), "rhyme cache fill");
                let group: RhymeGroup = words.into();
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, Arc::clone(&group));
                group
            }
            Err(err) => {
                warn!(word = %key, error = %err, "rhyme lookup failed, treating as no rhymes");
                RhymeGroup::from(Vec::new())
            }
        }
    }

    /// The cached group for `word`, without touching the source.
    pub fn peek(&self, word: &str) -> Option<RhymeGroup> {
        self.cached(&word.to_lowercase())
    }

    fn cached(&self, key: &str) -> Option<RhymeGroup> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of populated keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
