// Error type for the lyric transforms and their configuration.
//
// Only request-shape problems surface here: an unknown rhyme scheme, a zero
// tempo, a bad config file. Collaborator outages (rhyme source down, slow
// lookups) never reach callers; the rhyme cache absorbs them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LyricError {
    #[error("unsupported rhyme scheme '{0}' (expected AABB or ABAB)")]
    InvalidScheme(String),

    #[error("tempo must be a positive BPM, got {0}")]
    InvalidTempo(u32),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("malformed config JSON: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
