// English phonetics helpers for Lyricsmith.
//
// Provides the two collaborators the lyric transforms lean on: a syllable
// estimator (line segmentation) and a rhyme source (rhyme scheme
// optimization). Both sit behind traits so `lyricsmith_lyrics` can be tested
// with fakes and deployed against a heavier backend.
//
// Architecture:
// - `syllables.rs`: `SyllableEstimator` trait and the spelling-rule
//   `HeuristicSyllables` estimator
// - `rhyme.rs`: `RhymeSource` trait, `RhymeSourceError`, and the
//   `TimeoutRhymeSource` wrapper
// - `lib.rs` (this file): `RhymeDictionary`, a JSON-loaded table of rhyme
//   families that implements `RhymeSource`
//
// The default dictionary lives in `data/rhyme_families.json` and is embedded
// with `include_str!` by `default_dictionary()`.

pub mod rhyme;
pub mod syllables;

pub use rhyme::{
    DEFAULT_LOOKUP_QUEUE, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_LOOKUP_WORKERS, RhymeSource,
    RhymeSourceError, TimeoutRhymeSource,
};
pub use syllables::{HeuristicSyllables, SyllableEstimator};

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A set of words sharing one end sound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RhymeFamily {
    /// Spelling of the shared sound, for humans reading the file ("ight").
    pub sound: String,
    /// Member words, lowercase.
    pub words: Vec<String>,
}

/// Top-level JSON structure for a rhyme dictionary file.
#[derive(Debug, Deserialize)]
struct RhymeFile {
    families: Vec<RhymeFamily>,
}

/// Error loading a dictionary from disk.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read rhyme dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rhyme dictionary: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An in-memory rhyme dictionary built from rhyme families.
///
/// A word may belong to several families (heteronyms, loose rhymes). Its
/// rhymes are the other members of all its families, in file order, without
/// duplicates and without the word itself.
#[derive(Debug, Clone)]
pub struct RhymeDictionary {
    families: Vec<RhymeFamily>,
    index: FxHashMap<String, Vec<usize>>,
}

impl RhymeDictionary {
    /// Build from families, lowercasing every word.
    pub fn new(families: Vec<RhymeFamily>) -> Self {
        let families: Vec<RhymeFamily> = families
            .into_iter()
            .map(|f| RhymeFamily {
                sound: f.sound,
                words: f.words.iter().map(|w| w.to_lowercase()).collect(),
            })
            .collect();

        let mut index: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (i, family) in families.iter().enumerate() {
            for word in &family.words {
                let slots = index.entry(word.clone()).or_default();
                if !slots.contains(&i) {
                    slots.push(i);
                }
            }
        }

        Self { families, index }
    }

    /// Parse a dictionary from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: RhymeFile = serde_json::from_str(json)?;
        Ok(Self::new(file.families))
    }

    /// Read and parse a dictionary file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dictionary = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            families = dictionary.families.len(),
            "loaded rhyme dictionary"
        );
        Ok(dictionary)
    }

    pub fn families(&self) -> &[RhymeFamily] {
        &self.families
    }

    /// Number of distinct words known to the dictionary.
    pub fn word_count(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(&word.to_lowercase())
    }

    /// Other members of `word`'s families. Case-insensitive.
    pub fn rhymes(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let Some(slots) = self.index.get(&word) else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::new();
        for &i in slots {
            for candidate in &self.families[i].words {
                if *candidate != word && !out.contains(candidate) {
                    out.push(candidate.clone());
                }
            }
        }
        out
    }
}

impl RhymeSource for RhymeDictionary {
    fn rhymes_for(&self, word: &str) -> Result<Vec<String>, RhymeSourceError> {
        Ok(self.rhymes(word))
    }
}

/// Load the rhyme dictionary embedded at compile time.
///
/// Panics if the embedded JSON is malformed, which the tests below rule out.
pub fn default_dictionary() -> RhymeDictionary {
    let json = include_str!("../../data/rhyme_families.json");
    RhymeDictionary::from_json(json).expect("embedded rhyme_families.json is malformed")
}
