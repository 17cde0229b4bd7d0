// Line segmentation: breaks a flat token stream into singable lines.
//
// Each line holds at most `budget` syllables, where the budget scales
// inversely with tempo around a reference of 120 BPM and is clamped to
// [6, 12]:
//
//   budget = clamp(round(base_syllables * 120 / bpm), 6, 12)
//
// Tokens are packed greedily in order. A token that would push the running
// count past the budget closes the current line and opens the next one. A
// token heavier than the whole budget still gets a line to itself; words are
// never split or dropped.
//
// Syllable weights come from a `SyllableEstimator` (see
// `lyricsmith_phonetics::syllables`); its heuristic error is accepted as-is.

use lyricsmith_phonetics::SyllableEstimator;

use crate::types::{Line, LyricBlock, Tempo};

/// Syllables per line at the reference tempo, absent configuration.
pub const DEFAULT_BASE_SYLLABLES: u32 = 8;
pub const MIN_SYLLABLE_BUDGET: u32 = 6;
pub const MAX_SYLLABLE_BUDGET: u32 = 12;

/// Tempo-adjusted syllable budget per line.
///
/// Rounds half away from zero in integer arithmetic.
pub fn syllable_budget(base_syllables: u32, tempo: Tempo) -> u32 {
    let bpm = u64::from(tempo.bpm());
    let scaled = u64::from(base_syllables) * u64::from(Tempo::REFERENCE.bpm());
    let rounded = (2 * scaled + bpm) / (2 * bpm);
    let clamped = rounded.clamp(
        u64::from(MIN_SYLLABLE_BUDGET),
        u64::from(MAX_SYLLABLE_BUDGET),
    );
    clamped as u32
}

/// Pack `tokens` into lines under the tempo-adjusted syllable budget.
pub fn segment_lines<T, E>(
    tokens: &[T],
    tempo: Tempo,
    base_syllables: u32,
    estimator: &E,
) -> LyricBlock
where
    T: AsRef<str>,
    E: SyllableEstimator + ?Sized,
{
    let budget = syllable_budget(base_syllables, tempo);
    let mut lines = Vec::new();
    let mut current = Line::default();
    let mut current_syllables = 0u32;

    for token in tokens {
        let token = token.as_ref();
        let weight = estimator.estimate(token);
        if !current.is_empty() && current_syllables.saturating_add(weight) > budget {
            lines.push(std::mem::take(&mut current));
            current_syllables = 0;
        }
        current.push(token.to_owned());
        current_syllables = current_syllables.saturating_add(weight);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    LyricBlock::new(lines)
}

/// Whitespace-split `text`, then segment it.
pub fn segment_text<E>(text: &str, tempo: Tempo, base_syllables: u32, estimator: &E) -> LyricBlock
where
    E: SyllableEstimator + ?Sized,
{
    let tokens: Vec<&str> = text.split_whitespace().collect();
    segment_lines(&tokens, tempo, base_syllables, estimator)
}
