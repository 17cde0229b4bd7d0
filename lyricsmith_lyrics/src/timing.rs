// Line timestamps and LRC output.
//
// Assumes 4/4 time with a fixed number of beats per sung line (4 by
// default), so line `k` starts at `k * beats_per_line * 60 / bpm` seconds.
// Times are computed in integer milliseconds and rounded to the nearest
// hundredth for LRC tags (`[mm:ss.xx]`), which is what karaoke players and
// DAW lyric tracks read.

use serde::Serialize;

use crate::types::{LyricBlock, Tempo};

pub const DEFAULT_BEATS_PER_LINE: u32 = 4;

/// A line with its start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedLine {
    pub start_ms: u64,
    pub text: String,
}

/// Start time of line `index`, rounded to the nearest millisecond.
pub fn line_start_ms(index: usize, tempo: Tempo, beats_per_line: u32) -> u64 {
    let bpm = u64::from(tempo.bpm());
    let numerator = index as u64 * u64::from(beats_per_line) * 60_000;
    (2 * numerator + bpm) / (2 * bpm)
}

pub fn timestamp_lines(block: &LyricBlock, tempo: Tempo, beats_per_line: u32) -> Vec<TimedLine> {
    block
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| TimedLine {
            start_ms: line_start_ms(i, tempo, beats_per_line),
            text: line.to_string(),
        })
        .collect()
}

/// Format milliseconds as an LRC time tag.
pub fn format_lrc_tag(ms: u64) -> String {
    let centis = (ms + 5) / 10;
    let minutes = centis / 6000;
    let seconds = (centis / 100) % 60;
    let hundredths = centis % 100;
    format!("[{minutes:02}:{seconds:02}.{hundredths:02}]")
}

/// Render `block` as LRC text, one tagged line per lyric line.
pub fn to_lrc(block: &LyricBlock, tempo: Tempo, beats_per_line: u32) -> String {
    timestamp_lines(block, tempo, beats_per_line)
        .iter()
        .map(|t| format!("{}{}", format_lrc_tag(t.start_ms), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}
