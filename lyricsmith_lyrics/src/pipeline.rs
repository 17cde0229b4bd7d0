// End-to-end lyric processing: raw text -> segmented lines -> rhymed lines.
//
// `LyricPipeline` owns the config, a syllable estimator, and a rhyme
// optimizer (and through it, the rhyme cache), so repeated requests share
// cached rhyme groups. `process` handles one request with a caller-supplied
// picker; `process_batch` fans a slice of requests out over rayon.
//
// Batch determinism: request `k` gets its own `LyricRng` seeded from
// `seed + k`, so output does not depend on thread scheduling. The shared
// cache is safe to hit concurrently (see `cache.rs`).

use lyricsmith_phonetics::{HeuristicSyllables, RhymeSource, SyllableEstimator};
use lyricsmith_prng::LyricRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LyricConfig;
use crate::error::LyricError;
use crate::optimizer::{OptimizeReport, RhymeOptimizer, RhymePicker, RhymeScheme};
use crate::segment::{segment_text, syllable_budget};
use crate::types::{LyricBlock, Tempo};

/// One unit of work: generated text plus how to shape it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricRequest {
    /// Raw generated text; line breaks in it are ignored.
    pub text: String,
    /// Tempo in BPM. Falls back to the config's `default_bpm`.
    #[serde(default)]
    pub bpm: Option<u32>,
    /// Rhyme scheme. Falls back to the config's `scheme`.
    #[serde(default)]
    pub scheme: Option<RhymeScheme>,
}

impl LyricRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bpm: None,
            scheme: None,
        }
    }

    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = Some(bpm);
        self
    }

    pub fn with_scheme(mut self, scheme: RhymeScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }
}

/// The result of processing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedLyrics {
    pub block: LyricBlock,
    pub tempo: Tempo,
    /// Syllable budget the segmenter used.
    pub budget: u32,
    /// Scheme applied, if any.
    pub scheme: Option<RhymeScheme>,
    pub report: OptimizeReport,
}

pub struct LyricPipeline<S, E = HeuristicSyllables> {
    config: LyricConfig,
    estimator: E,
    optimizer: RhymeOptimizer<S>,
}

impl<S: RhymeSource> LyricPipeline<S, HeuristicSyllables> {
    /// Pipeline with the spelling-rule syllable estimator.
    pub fn with_source(config: LyricConfig, source: S) -> Self {
        Self::new(config, source, HeuristicSyllables)
    }
}

impl<S: RhymeSource, E: SyllableEstimator> LyricPipeline<S, E> {
    pub fn new(config: LyricConfig, source: S, estimator: E) -> Self {
        Self {
            config,
            estimator,
            optimizer: RhymeOptimizer::new(source),
        }
    }

    pub fn config(&self) -> &LyricConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &RhymeOptimizer<S> {
        &self.optimizer
    }

    /// Segment `request.text` and, if a scheme applies, optimize its rhymes.
    pub fn process<P>(
        &self,
        request: &LyricRequest,
        picker: &mut P,
    ) -> Result<ProcessedLyrics, LyricError>
    where
        P: RhymePicker + ?Sized,
    {
        let tempo = Tempo::new(request.bpm.unwrap_or(self.config.default_bpm))?;
        let budget = syllable_budget(self.config.base_syllables, tempo);
        let block = segment_text(
            &request.text,
            tempo,
            self.config.base_syllables,
            &self.estimator,
        );
        debug!(bpm = tempo.bpm(), budget, lines = block.len(), "segmented lyrics");

        let scheme = request.scheme.or(self.config.scheme);
        let (block, report) = match scheme {
            Some(scheme) => self.optimizer.optimize(&block, scheme, picker),
            None => (block, OptimizeReport::default()),
        };

        Ok(ProcessedLyrics {
            block,
            tempo,
            budget,
            scheme,
            report,
        })
    }
}

impl<S, E> LyricPipeline<S, E>
where
    S: RhymeSource + Sync,
    E: SyllableEstimator + Sync,
{
    /// Process `requests` in parallel. Results come back in request order.
    pub fn process_batch(
        &self,
        requests: &[LyricRequest],
        seed: u64,
    ) -> Vec<Result<ProcessedLyrics, LyricError>> {
        requests
            .par_iter()
            .enumerate()
            .map(|(i, request)| {
                let mut rng = LyricRng::for_batch_item(seed, i);
                self.process(request, &mut rng)
            })
            .collect()
    }
}
