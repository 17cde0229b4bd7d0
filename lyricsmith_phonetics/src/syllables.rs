// Syllable estimation for English lyric tokens.
//
// The line segmenter in `lyricsmith_lyrics` weighs every token by its
// syllable count. Exact counts need a pronunciation dictionary; this module
// provides the `SyllableEstimator` seam plus `HeuristicSyllables`, a
// spelling-based estimator that is good enough for singability budgets.
//
// Estimation never fails. A token with no letters at all (a dash, a stray
// digit run) still weighs one syllable, since it occupies a beat when sung.
//
// Heuristic, in order:
// 1. Strip everything but ASCII letters, lowercase.
// 2. Exceptions table for common words the rules get wrong.
// 3. Peel a weak suffix (-ly, -ment, -ful, -less, -ness) and count the stem
//    recursively, so a silent stem `e` ("lovely", "movement") is handled.
// 4. Count vowel groups (`y` is a vowel except word-initially).
// 5. Drop a silent final `e`, `-es` and `-ed`; keep `-le`, `-ted`/`-ded`,
//    and sibilant `-es`.
// 6. Split the hiatus vowel pairs that spelling merges ("lion", "radio",
//    "being").

/// Something that can weigh a word in syllables.
pub trait SyllableEstimator {
    /// Best-effort syllable count for `word`. Never fails.
    fn estimate(&self, word: &str) -> u32;
}

/// Spelling-rule syllable estimator. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSyllables;

impl SyllableEstimator for HeuristicSyllables {
    fn estimate(&self, word: &str) -> u32 {
        let letters: String = word
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if letters.is_empty() {
            return 1;
        }
        count_letters(&letters).max(1)
    }
}

const WEAK_SUFFIXES: &[&str] = &["ment", "ness", "less", "ful", "ly"];

fn exception(word: &str) -> Option<u32> {
    let n = match word {
        "business" => 2,
        "every" => 2,
        "evening" => 2,
        "fire" | "hour" | "our" | "sure" => 1,
        "heaven" | "poem" | "quiet" | "science" | "people" => 2,
        "idea" | "area" => 3,
        "different" => 3,
        "million" | "billion" => 2,
        "toward" | "towards" => 2,
        "naive" => 2,
        "queue" => 1,
        _ => return None,
    };
    Some(n)
}

fn count_letters(word: &str) -> u32 {
    if let Some(n) = exception(word) {
        return n;
    }

    for suffix in WEAK_SUFFIXES {
        if let Some(stem) = word.strip_suffix(*suffix) {
            if stem.len() > 2 {
                return count_letters(stem).max(1) + 1;
            }
        }
    }

    let bytes = word.as_bytes();
    let mut groups = vowel_groups(bytes);

    if groups > 1 && ends_with_silent_e(bytes) {
        groups -= 1;
    } else if groups > 1 && ends_with_silent_es(bytes) {
        groups -= 1;
    } else if groups > 1 && ends_with_silent_ed(bytes) {
        groups -= 1;
    }

    groups + hiatus_splits(bytes)
}

fn is_vowel_at(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => true,
        // Word-initial `y` is a consonant ("you", "yes").
        b'y' => i > 0,
        _ => false,
    }
}

fn vowel_groups(bytes: &[u8]) -> u32 {
    let mut groups = 0;
    let mut prev_vowel = false;
    for i in 0..bytes.len() {
        let vowel = is_vowel_at(bytes, i);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }
    groups
}

/// Final `e` after a consonant, except the syllabic `-le` ("table").
fn ends_with_silent_e(bytes: &[u8]) -> bool {
    let n = bytes.len();
    if n < 3 || bytes[n - 1] != b'e' || is_vowel_at(bytes, n - 2) {
        return false;
    }
    !(bytes[n - 2] == b'l' && !is_vowel_at(bytes, n - 3))
}

/// `-es` after a non-sibilant consonant ("shines", but not "kisses", "places").
fn ends_with_silent_es(bytes: &[u8]) -> bool {
    let n = bytes.len();
    if n < 4 || !bytes.ends_with(b"es") || is_vowel_at(bytes, n - 3) {
        return false;
    }
    let before = bytes[n - 3];
    if matches!(before, b's' | b'x' | b'z' | b'c' | b'g') {
        return false;
    }
    if before == b'h' && matches!(bytes[n - 4], b'c' | b's') {
        return false;
    }
    // Syllabic "-les" as in "tables".
    !(before == b'l' && !is_vowel_at(bytes, n - 4))
}

/// `-ed` after a consonant other than `t`/`d` ("danced", but not "wanted").
fn ends_with_silent_ed(bytes: &[u8]) -> bool {
    let n = bytes.len();
    if n < 4 || !bytes.ends_with(b"ed") || is_vowel_at(bytes, n - 3) {
        return false;
    }
    !matches!(bytes[n - 3], b't' | b'd')
}

/// Extra syllables for vowel pairs pronounced as two beats.
fn hiatus_splits(bytes: &[u8]) -> u32 {
    let n = bytes.len();
    let mut extra = 0;
    for i in 0..n.saturating_sub(1) {
        let pair = &bytes[i..i + 2];
        let split = matches!(pair, b"ia" | b"io" | b"eo" | b"uo")
            // "-tion", "-sion", "-cial", "-gion" stay one syllable.
            && !(i > 0 && matches!(bytes[i - 1], b't' | b's' | b'c' | b'g'));
        if split {
            extra += 1;
        }
    }
    // "being", "going", "seeing": the `i` of `-ing` merges with the vowel
    // before it in spelling only.
    if n >= 4 && bytes.ends_with(b"ing") && is_vowel_at(bytes, n - 4) {
        extra += 1;
    }
    extra
}
