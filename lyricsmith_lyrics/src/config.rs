// Data-driven lyric processing configuration.
//
// Tunables for segmentation, timing, and rhyme lookup live in `LyricConfig`,
// loaded from JSON (string in, typed struct out). Every field has a default,
// so a config file only needs the values it changes; CLI flags override
// whatever the file says.
//
// The budget clamp range [6, 12] is not configurable; see `segment.rs`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LyricError;
use crate::optimizer::RhymeScheme;
use crate::segment::DEFAULT_BASE_SYLLABLES;
use crate::timing::DEFAULT_BEATS_PER_LINE;
use crate::types::Tempo;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricConfig {
    /// Syllables per line at 120 BPM, before tempo scaling and clamping.
    pub base_syllables: u32,
    /// Tempo used when a request does not give one.
    pub default_bpm: u32,
    /// Beats each line occupies when computing timestamps.
    pub beats_per_line: u32,
    /// Wall-clock limit for a single rhyme lookup, in milliseconds.
    pub rhyme_timeout_ms: u64,
    /// Rhyme scheme applied when a request does not name one. `None` skips
    /// rhyme optimization.
    pub scheme: Option<RhymeScheme>,
    /// Seed for rhyme candidate choice. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for LyricConfig {
    fn default() -> Self {
        Self {
            base_syllables: DEFAULT_BASE_SYLLABLES,
            default_bpm: Tempo::REFERENCE.bpm(),
            beats_per_line: DEFAULT_BEATS_PER_LINE,
            rhyme_timeout_ms: 3000,
            scheme: None,
            seed: None,
        }
    }
}

impl LyricConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, LyricError> {
        let config: LyricConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn load(path: &Path) -> Result<Self, LyricError> {
        let json = std::fs::read_to_string(path).map_err(|source| LyricError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), LyricError> {
        if self.base_syllables == 0 {
            return Err(LyricError::InvalidConfig(
                "base_syllables must be positive".into(),
            ));
        }
        if self.beats_per_line == 0 {
            return Err(LyricError::InvalidConfig(
                "beats_per_line must be positive".into(),
            ));
        }
        if self.rhyme_timeout_ms == 0 {
            return Err(LyricError::InvalidConfig(
                "rhyme_timeout_ms must be positive".into(),
            ));
        }
        self.default_tempo().map(|_| ())
    }

    pub fn default_tempo(&self) -> Result<Tempo, LyricError> {
        Tempo::new(self.default_bpm)
    }

    pub fn rhyme_timeout(&self) -> Duration {
        Duration::from_millis(self.rhyme_timeout_ms)
    }
}
