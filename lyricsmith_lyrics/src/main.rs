// Lyricsmith CLI entry point.
//
// Reads raw generated lyrics from a file (or stdin), breaks them into lines
// sized for the tempo, optionally rewrites line endings to follow a rhyme
// scheme, and prints the result as plain text, LRC, or JSON.
//
// Usage:
//   lyricsmith [OPTIONS] [INPUT]
//     --bpm <N>              Tempo in BPM (default: config, else 120)
//     --base-syllables <N>   Syllables per line at 120 BPM (default: 8)
//     --scheme <S>           Rhyme scheme: AABB or ABAB (default: none)
//     --seed <N>             Seed for rhyme choice (default: clock)
//     --first-candidate      Always take the first rhyme candidate
//     --config <PATH>        JSON config file
//     --dictionary <PATH>    JSON rhyme dictionary (default: built-in)
//     --lrc                  Print LRC with line timestamps
//     --json                 Print JSON with lines, replacements, cache stats
//
// Logging goes to stderr through `tracing`; set RUST_LOG=debug to see cache
// fills and rhyme replacements.

use std::io::Read;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow, bail};
use lyricsmith_lyrics::timing::to_lrc;
use lyricsmith_lyrics::{
    CacheStats, FirstCandidate, LyricConfig, LyricPipeline, LyricRequest, ProcessedLyrics,
    RhymePicker, RhymeScheme,
};
use lyricsmith_phonetics::{RhymeDictionary, TimeoutRhymeSource, default_dictionary};
use lyricsmith_prng::LyricRng;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Lrc,
    Json,
}

/// `--json` output: the processed lyrics plus rhyme cache counters.
#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    lyrics: &'a ProcessedLyrics,
    cache: CacheStats,
}

#[derive(Debug)]
struct CliArgs {
    input: Option<PathBuf>,
    bpm: Option<u32>,
    base_syllables: Option<u32>,
    scheme: Option<RhymeScheme>,
    seed: Option<u64>,
    first_candidate: bool,
    config: Option<PathBuf>,
    dictionary: Option<PathBuf>,
    format: OutputFormat,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    setup_tracing()?;
    let args = parse_args(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => LyricConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LyricConfig::default(),
    };
    if let Some(base) = args.base_syllables {
        config.base_syllables = base;
    }
    if let Some(bpm) = args.bpm {
        config.default_bpm = bpm;
    }
    if args.scheme.is_some() {
        config.scheme = args.scheme;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let dictionary = match &args.dictionary {
        Some(path) => RhymeDictionary::load(path)?,
        None => default_dictionary(),
    };
    info!(
        families = dictionary.families().len(),
        words = dictionary.word_count(),
        "rhyme dictionary loaded"
    );
    let source = TimeoutRhymeSource::new(dictionary, config.rhyme_timeout());

    let text = read_input(args.input.as_deref())?;
    let tempo = config.default_tempo()?;
    let beats_per_line = config.beats_per_line;

    let mut picker: Box<dyn RhymePicker> = if args.first_candidate {
        Box::new(FirstCandidate)
    } else {
        let seed = config.seed.unwrap_or_else(clock_seed);
        info!(seed, "rhyme choice seeded");
        Box::new(LyricRng::new(seed))
    };

    let pipeline = LyricPipeline::with_source(config, source);
    let processed = pipeline.process(&LyricRequest::new(text), picker.as_mut())?;
    let stats = pipeline.optimizer().cache().stats();
    info!(
        lines = processed.block.len(),
        budget = processed.budget,
        replacements = processed.report.replacements.len(),
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "lyrics processed"
    );

    match args.format {
        OutputFormat::Text => println!("{}", processed.block),
        OutputFormat::Lrc => println!("{}", to_lrc(&processed.block, tempo, beats_per_line)),
        OutputFormat::Json => println!("{}", render_json(&processed, stats)?),
    }
    Ok(())
}

fn render_json(lyrics: &ProcessedLyrics, cache: CacheStats) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOutput { lyrics, cache })?)
}

fn setup_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialise tracing: {err}"))
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Parse command-line arguments. Simple flag matching, no clap dependency.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut cli = CliArgs {
        input: None,
        bpm: None,
        base_syllables: None,
        scheme: None,
        seed: None,
        first_candidate: false,
        config: None,
        dictionary: None,
        format: OutputFormat::Text,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bpm" => cli.bpm = Some(flag_value(&mut args, "--bpm")?),
            "--base-syllables" => {
                cli.base_syllables = Some(flag_value(&mut args, "--base-syllables")?)
            }
            "--scheme" => cli.scheme = Some(flag_value(&mut args, "--scheme")?),
            "--seed" => cli.seed = Some(flag_value(&mut args, "--seed")?),
            "--config" => cli.config = Some(flag_value(&mut args, "--config")?),
            "--dictionary" => cli.dictionary = Some(flag_value(&mut args, "--dictionary")?),
            "--first-candidate" => cli.first_candidate = true,
            "--lrc" => cli.format = OutputFormat::Lrc,
            "--json" => cli.format = OutputFormat::Json,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                print_usage();
                bail!("unknown argument: {other}");
            }
            path => {
                if cli.input.is_some() {
                    bail!("more than one input file given");
                }
                cli.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(cli)
}

fn flag_value<T>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?;
    raw.parse()
        .map_err(|err| anyhow!("invalid value '{raw}' for {flag}: {err}"))
}

fn print_usage() {
    println!("Usage: lyricsmith [OPTIONS] [INPUT]");
    println!();
    println!("Reads lyrics from INPUT, or stdin when omitted.");
    println!();
    println!("Options:");
    println!("  --bpm <N>              Tempo in BPM (default: 120)");
    println!("  --base-syllables <N>   Syllables per line at 120 BPM (default: 8)");
    println!("  --scheme <S>           Rhyme scheme: AABB or ABAB");
    println!("  --seed <N>             Seed for rhyme choice");
    println!("  --first-candidate      Always take the first rhyme candidate");
    println!("  --config <PATH>        JSON config file");
    println!("  --dictionary <PATH>    JSON rhyme dictionary");
    println!("  --lrc                  Print LRC with line timestamps");
    println!("  --json                 Print JSON with lines and replacements");
    println!("  --help, -h             Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults() {
        let cli = parse(&[]).unwrap();
        assert!(cli.input.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.first_candidate);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = parse(&[
            "--bpm", "90", "--scheme", "ABAB", "--seed", "5", "--lrc", "song.txt",
        ])
        .unwrap();
        assert_eq!(cli.bpm, Some(90));
        assert_eq!(cli.scheme, Some(RhymeScheme::Abab));
        assert_eq!(cli.seed, Some(5));
        assert_eq!(cli.format, OutputFormat::Lrc);
        assert_eq!(cli.input, Some(PathBuf::from("song.txt")));
    }

    #[test]
    fn test_parse_rejects_bad_scheme() {
        let err = parse(&["--scheme", "XYZ"]).unwrap_err();
        assert!(err.to_string().contains("XYZ"), "{err}");
    }

    #[test]
    fn test_parse_scheme_is_case_sensitive() {
        let err = parse(&["--scheme", "abab"]).unwrap_err();
        assert!(err.to_string().contains("abab"), "{err}");
    }

    #[test]
    fn test_json_output_includes_cache_stats() {
        let pipeline = LyricPipeline::with_source(
            LyricConfig::default(),
            lyricsmith_phonetics::default_dictionary(),
        );
        let request = LyricRequest::new("in the light\nwe go").with_scheme(RhymeScheme::Aabb);
        let processed = pipeline.process(&request, &mut FirstCandidate).unwrap();
        let stats = pipeline.optimizer().cache().stats();

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&processed, stats).unwrap()).unwrap();
        assert_eq!(json["tempo"], 120);
        assert_eq!(json["scheme"], "AABB");
        assert_eq!(json["cache"]["misses"], stats.misses);
        assert_eq!(json["cache"]["hits"], stats.hits);
    }

    #[test]
    fn test_parse_missing_value() {
        assert!(parse(&["--bpm"]).is_err());
        assert!(parse(&["--bpm", "fast"]).is_err());
    }

    #[test]
    fn test_parse_unknown_flag_and_extra_input() {
        assert!(parse(&["--loud"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
    }
}
