// Core lyric types: lines, lyric blocks, and tempo.
//
// - `Line` — ordered word tokens, rendered space-joined
// - `LyricBlock` — ordered lines, rendered newline-joined; the unit both
//   transforms consume and produce
// - `Tempo` — a validated, positive BPM
//
// Lines are built by the segmenter and only ever changed afterwards by the
// rhyme optimizer swapping out their last word.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::LyricError;

/// One sung line: an ordered sequence of word tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line {
    words: Vec<String>,
}

impl Line {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Split a line of text on whitespace.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_owned).collect(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The rhyme-bearing word, as written (punctuation included).
    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    /// Swap the last word for `word`, returning the old one. A no-op on an
    /// empty line.
    pub fn replace_last_word(&mut self, word: String) -> Option<String> {
        let last = self.words.last_mut()?;
        Some(std::mem::replace(last, word))
    }

    pub(crate) fn push(&mut self, word: String) {
        self.words.push(word);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

/// An ordered block of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LyricBlock {
    lines: Vec<Line>,
}

impl LyricBlock {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Parse newline-delimited lyrics. Blank lines are dropped.
    pub fn from_text(text: &str) -> Self {
        text.trim()
            .lines()
            .map(Line::from_text)
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every token of every line, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .flat_map(|line| line.words.iter().map(String::as_str))
    }

    pub(crate) fn line_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }
}

impl FromIterator<Line> for LyricBlock {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for LyricBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A positive tempo in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tempo(NonZeroU32);

impl Tempo {
    /// The tempo the syllable budget is calibrated against.
    pub const REFERENCE: Tempo = match NonZeroU32::new(120) {
        Some(bpm) => Tempo(bpm),
        None => panic!("reference tempo must be non-zero"),
    };

    pub fn new(bpm: u32) -> Result<Self, LyricError> {
        NonZeroU32::new(bpm)
            .map(Tempo)
            .ok_or(LyricError::InvalidTempo(bpm))
    }

    pub fn bpm(self) -> u32 {
        self.0.get()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl TryFrom<u32> for Tempo {
    type Error = LyricError;

    fn try_from(bpm: u32) -> Result<Self, Self::Error> {
        Tempo::new(bpm)
    }
}

impl From<Tempo> for u32 {
    fn from(tempo: Tempo) -> u32 {
        tempo.bpm()
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm())
    }
}
