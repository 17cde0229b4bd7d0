// Rhyme scheme optimizer: rewrites line-ending words so paired lines rhyme.
//
// For each line pair the scheme designates, the last word of the first line
// seeds a rhyme lookup (through `RhymeCache`). If the second line's last word
// is not already in that rhyme group, it is replaced by a candidate from the
// group. Every other token stays as it was.
//
// Pairs per scheme:
// - AABB: (0,1), (2,3), (4,5), ... across the whole block.
// - ABAB: (0,2) and (1,3) only, and only when the block has at least four
//   lines. Lines past index 3 are left alone.
//
// Matching strips trailing `.,!?` from the end word and compares
// case-insensitively. A replacement word is inserted bare; the replaced
// word's trailing punctuation is not carried over.
//
// Degradation is silent: an empty rhyme group (unknown seed, source outage)
// leaves the line unchanged. Only an unrecognized scheme name is an error,
// and it is reported before any line is touched.
//
// Candidate choice goes through `RhymePicker`: `LyricRng` picks uniformly,
// `FirstCandidate` always takes the first entry.

use std::fmt;
use std::str::FromStr;

use lyricsmith_phonetics::RhymeSource;
use lyricsmith_prng::LyricRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::RhymeCache;
use crate::error::LyricError;
use crate::types::LyricBlock;

/// Punctuation ignored at the end of a rhyme-bearing word.
const TRAILING_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// Supported end-rhyme patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RhymeScheme {
    #[serde(rename = "AABB")]
    Aabb,
    #[serde(rename = "ABAB")]
    Abab,
}

impl RhymeScheme {
    pub const ALL: [RhymeScheme; 2] = [RhymeScheme::Aabb, RhymeScheme::Abab];

    /// `(seed_line, target_line)` pairs for a block of `line_count` lines.
    pub fn pairs(self, line_count: usize) -> Vec<(usize, usize)> {
        match self {
            RhymeScheme::Aabb => (0..line_count.saturating_sub(1))
                .step_by(2)
                .map(|i| (i, i + 1))
                .collect(),
            RhymeScheme::Abab if line_count >= 4 => vec![(0, 2), (1, 3)],
            RhymeScheme::Abab => Vec::new(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RhymeScheme::Aabb => "AABB",
            RhymeScheme::Abab => "ABAB",
        }
    }
}

impl FromStr for RhymeScheme {
    type Err = LyricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AABB" => Ok(RhymeScheme::Aabb),
            "ABAB" => Ok(RhymeScheme::Abab),
            _ => Err(LyricError::InvalidScheme(s.to_string())),
        }
    }
}

impl fmt::Display for RhymeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy for choosing among rhyme candidates.
pub trait RhymePicker {
    /// Index into `candidates`, or `None` to leave the line as is.
    fn pick(&mut self, candidates: &[String]) -> Option<usize>;
}

impl RhymePicker for LyricRng {
    fn pick(&mut self, candidates: &[String]) -> Option<usize> {
        self.choose_index(candidates.len())
    }
}

impl<P: RhymePicker + ?Sized> RhymePicker for &mut P {
    fn pick(&mut self, candidates: &[String]) -> Option<usize> {
        (**self).pick(candidates)
    }
}

/// Always picks the first candidate. Deterministic without a seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl RhymePicker for FirstCandidate {
    fn pick(&mut self, candidates: &[String]) -> Option<usize> {
        if candidates.is_empty() { None } else { Some(0) }
    }
}

/// One end-word swap made by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Index of the rewritten line.
    pub line: usize,
    /// Index of the line whose end word seeded the rhyme.
    pub seed_line: usize,
    /// The end word before the swap, as written.
    pub original: String,
    pub replacement: String,
}

/// Everything the optimizer changed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub replacements: Vec<Replacement>,
}

impl OptimizeReport {
    pub fn is_unchanged(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Rhyme-bearing form of an end word: trailing punctuation stripped.
pub fn rhyme_key(word: &str) -> &str {
    word.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Rewrites end words to satisfy a rhyme scheme. Owns its rhyme cache.
#[derive(Debug)]
pub struct RhymeOptimizer<S> {
    cache: RhymeCache<S>,
}

impl<S: RhymeSource> RhymeOptimizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(RhymeCache::new(source))
    }

    pub fn with_cache(cache: RhymeCache<S>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RhymeCache<S> {
        &self.cache
    }

    /// Apply `scheme` to `block`, returning the new block and what changed.
    ///
    /// Blocks with fewer than two lines come back unchanged.
    pub fn optimize<P>(
        &self,
        block: &LyricBlock,
        scheme: RhymeScheme,
        picker: &mut P,
    ) -> (LyricBlock, OptimizeReport)
    where
        P: RhymePicker + ?Sized,
    {
        let mut optimized = block.clone();
        let mut report = OptimizeReport::default();
        let lines = block.lines();

        if lines.len() < 2 {
            return (optimized, report);
        }

        for (seed_idx, target_idx) in scheme.pairs(lines.len()) {
            let (Some(seed_word), Some(target_word)) =
                (lines[seed_idx].last_word(), lines[target_idx].last_word())
            else {
                continue;
            };

            let seed = rhyme_key(seed_word);
            if seed.is_empty() {
                continue;
            }

            let group = self.cache.lookup(seed);
            if group.is_empty() {
                continue;
            }

            let target = rhyme_key(target_word).to_lowercase();
            if group.iter().any(|w| w.to_lowercase() == target) {
                continue;
            }

            let Some(choice) = picker.pick(&group).and_then(|i| group.get(i)) else {
                continue;
            };

            if let Some(line) = optimized.line_mut(target_idx) {
                line.replace_last_word(choice.clone());
            }
            debug!(
                line = target_idx,
                seed = seed,
                from = target_word,
                to = choice.as_str(),
                "rhyme replacement"
            );
            report.replacements.push(Replacement {
                line: target_idx,
                seed_line: seed_idx,
                original: target_word.to_string(),
                replacement: choice.clone(),
            });
        }

        (optimized, report)
    }

    /// Like `optimize`, with the scheme given by name.
    ///
    /// An unrecognized name fails with `LyricError::InvalidScheme` and leaves
    /// the block untouched.
    pub fn optimize_named<P>(
        &self,
        block: &LyricBlock,
        scheme: &str,
        picker: &mut P,
    ) -> Result<(LyricBlock, OptimizeReport), LyricError>
    where
        P: RhymePicker + ?Sized,
    {
        let scheme: RhymeScheme = scheme.parse()?;
        Ok(self.optimize(block, scheme, picker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyricsmith_phonetics::RhymeDictionary;

    fn dictionary() -> RhymeDictionary {
        RhymeDictionary::from_json(
            r#"{"families": [
                {"sound": "ight", "words": ["light", "night", "bright"]},
                {"sound": "ay", "words": ["day", "way", "stay"]},
                {"sound": "art", "words": ["heart", "apart"]}
            ]}"#,
        )
        .unwrap()
    }

    fn block(text: &str) -> LyricBlock {
        LyricBlock::from_text(text)
    }

    #[test]
    fn test_scheme_parse_and_display() {
        assert_eq!("AABB".parse::<RhymeScheme>().unwrap(), RhymeScheme::Aabb);
        assert_eq!("ABAB".parse::<RhymeScheme>().unwrap(), RhymeScheme::Abab);
        assert_eq!(RhymeScheme::Abab.to_string(), "ABAB");
        for scheme in RhymeScheme::ALL {
            assert_eq!(scheme.to_string().parse::<RhymeScheme>().unwrap(), scheme);
        }
        assert!(matches!(
            "XYZ".parse::<RhymeScheme>(),
            Err(LyricError::InvalidScheme(s)) if s == "XYZ"
        ));
    }

    #[test]
    fn test_scheme_names_are_exact() {
        for name in ["aabb", "Abab", " ABAB ", "AABB\n", ""] {
            let parsed = name.parse::<RhymeScheme>();
            assert!(
                matches!(parsed, Err(LyricError::InvalidScheme(ref s)) if s == name),
                "{name:?} should be rejected"
            );
        }
        // Parsing by name and deserializing from config agree.
        assert!(serde_json::from_str::<RhymeScheme>(r#""aabb""#).is_err());
        assert_eq!(
            serde_json::from_str::<RhymeScheme>(r#""AABB""#).unwrap(),
            RhymeScheme::Aabb
        );
    }

    #[test]
    fn test_scheme_pairs() {
        assert!(RhymeScheme::Aabb.pairs(0).is_empty());
        assert!(RhymeScheme::Aabb.pairs(1).is_empty());
        assert_eq!(RhymeScheme::Aabb.pairs(5), vec![(0, 1), (2, 3)]);
        assert_eq!(RhymeScheme::Aabb.pairs(6), vec![(0, 1), (2, 3), (4, 5)]);
        assert!(RhymeScheme::Abab.pairs(3).is_empty());
        assert_eq!(RhymeScheme::Abab.pairs(8), vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_rhyme_key_strips_only_trailing_punctuation() {
        assert_eq!(rhyme_key("night!?"), "night");
        assert_eq!(rhyme_key("...night"), "...night");
        assert_eq!(rhyme_key("don't,"), "don't");
        assert_eq!(rhyme_key("!!"), "");
    }

    #[test]
    fn test_aabb_already_rhyming_is_unchanged() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("I feel the light\nYou are my night");
        let (out, report) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        assert_eq!(out, input);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_aabb_replaces_second_line_end() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("I feel the light\nYou are my day.\nHold my heart\nWe drift away");
        let (out, report) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        assert_eq!(
            out.to_string(),
            "I feel the light\nYou are my night\nHold my heart\nWe drift apart"
        );
        assert_eq!(report.replacements.len(), 2);
        assert_eq!(
            report.replacements[0],
            Replacement {
                line: 1,
                seed_line: 0,
                original: "day.".into(),
                replacement: "night".into(),
            }
        );
    }

    #[test]
    fn test_aabb_odd_trailing_line_untouched() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("in the light\nall the day\nstay");
        let (out, _) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        assert_eq!(out.to_string(), "in the light\nall the night\nstay");
    }

    #[test]
    fn test_unknown_seed_leaves_line() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("an orange\nmy heart");
        let (out, report) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        assert_eq!(out, input);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_membership_is_case_insensitive_and_ignores_punctuation() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("Into the LIGHT,\nThrough the Night!");
        let (out, _) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        assert_eq!(out, input);
    }

    #[test]
    fn test_abab_pairs_first_four_lines_only() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block(
            "see the light\nwalk the way\nhold me close\nend of story\nthe light\ngone away",
        );
        let (out, report) = optimizer.optimize(&input, RhymeScheme::Abab, &mut FirstCandidate);
        assert_eq!(
            out.to_string(),
            "see the light\nwalk the way\nhold me night\nend of day\nthe light\ngone away"
        );
        let lines: Vec<usize> = report.replacements.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_abab_needs_four_lines() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("the light\nthe way\nthe end");
        let (out, _) = optimizer.optimize(&input, RhymeScheme::Abab, &mut FirstCandidate);
        assert_eq!(out, input);
    }

    #[test]
    fn test_fewer_than_two_lines_unchanged() {
        let optimizer = RhymeOptimizer::new(dictionary());
        for scheme in RhymeScheme::ALL {
            let single = block("only the light");
            let (out, report) = optimizer.optimize(&single, scheme, &mut FirstCandidate);
            assert_eq!(out, single);
            assert!(report.is_unchanged());
        }
        let (out, _) =
            optimizer.optimize(&LyricBlock::default(), RhymeScheme::Aabb, &mut FirstCandidate);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_scheme_name_is_rejected() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("I feel the light\nYou are my day");
        let before = input.clone();
        for name in ["XYZ", "aabb", " ABAB "] {
            let err = optimizer
                .optimize_named(&input, name, &mut FirstCandidate)
                .unwrap_err();
            assert!(matches!(err, LyricError::InvalidScheme(_)));
        }
        assert_eq!(input, before);
        assert!(optimizer.cache().is_empty(), "no lookups before validation");
    }

    #[test]
    fn test_rng_picker_is_seed_deterministic() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("the light\nthe end\nthe day\nthe end");
        let run = |seed| {
            let mut rng = LyricRng::new(seed);
            optimizer.optimize(&input, RhymeScheme::Aabb, &mut rng).0
        };
        assert_eq!(run(11), run(11));
        let out = run(11);
        let end = out.lines()[1].last_word().unwrap();
        assert!(["night", "bright"].contains(&end), "got {end}");
    }

    #[test]
    fn test_picker_declining_leaves_line() {
        struct Never;
        impl RhymePicker for Never {
            fn pick(&mut self, _candidates: &[String]) -> Option<usize> {
                None
            }
        }
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("the light\nthe end");
        let (out, report) = optimizer.optimize(&input, RhymeScheme::Aabb, &mut Never);
        assert_eq!(out, input);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_lookups_go_through_cache() {
        let optimizer = RhymeOptimizer::new(dictionary());
        let input = block("the light\nthe end\nthe light\nthe end");
        optimizer.optimize(&input, RhymeScheme::Aabb, &mut FirstCandidate);
        let stats = optimizer.cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }
}
