// Lyricsmith lyric shaping.
//
// Turns raw generated lyric text into singable, rhymed lines. Two transforms
// carry the logic: a tempo-aware line segmenter and a rhyme scheme optimizer.
// Text generation, storage, and serving are left to callers; this crate is a
// library plus a small CLI (`lyricsmith`).
//
// Architecture:
// - types.rs: `Line`, `LyricBlock`, `Tempo`
// - segment.rs: syllable budget and greedy line packing
// - cache.rs: `RhymeCache`, memoizing lookups against a `RhymeSource`
// - optimizer.rs: `RhymeScheme`, `RhymePicker`, `RhymeOptimizer`
// - timing.rs: per-line timestamps and LRC rendering
// - config.rs: `LyricConfig`, loaded from JSON
// - pipeline.rs: `LyricPipeline`, single and rayon-parallel batch processing
// - error.rs: `LyricError`
//
// Syllable estimation and rhyme lookup come from `lyricsmith_phonetics`;
// randomness for rhyme choice from `lyricsmith_prng`. Given a seed, output
// is reproducible.

pub mod cache;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod pipeline;
pub mod segment;
pub mod timing;
pub mod types;

pub use cache::{CacheStats, RhymeCache, RhymeGroup};
pub use config::LyricConfig;
pub use error::LyricError;
pub use optimizer::{
    FirstCandidate, OptimizeReport, Replacement, RhymeOptimizer, RhymePicker, RhymeScheme,
};
pub use pipeline::{LyricPipeline, LyricRequest, ProcessedLyrics};
pub use segment::{segment_lines, segment_text, syllable_budget};
pub use types::{Line, LyricBlock, Tempo};
