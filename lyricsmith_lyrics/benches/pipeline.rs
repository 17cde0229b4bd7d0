// Benchmarks for line segmentation and the full segment + rhyme pipeline.
//
// Run with `cargo bench -p lyricsmith_lyrics`. The pipeline bench reuses one
// `LyricPipeline` across iterations, so after the first pass every rhyme
// lookup is a cache hit; it measures steady-state request cost.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lyricsmith_lyrics::{
    FirstCandidate, LyricConfig, LyricPipeline, LyricRequest, RhymeScheme, Tempo, segment_text,
};
use lyricsmith_phonetics::{HeuristicSyllables, default_dictionary};

const VERSE: &str = "Your love shines bright in the morning light dancing to the beat \
    of our hearts we hold on through the night and never drift apart the fire \
    in your eyes is a flame that will not die so sing it loud and sing it true \
    until the stars come down to you";

fn long_text() -> String {
    vec![VERSE; 50].join(" ")
}

fn bench_segment(c: &mut Criterion) {
    let text = long_text();
    let tempo = Tempo::new(96).unwrap();
    c.bench_function("segment_text_50_verses", |b| {
        b.iter(|| segment_text(black_box(&text), tempo, 8, &HeuristicSyllables))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = LyricPipeline::with_source(LyricConfig::default(), default_dictionary());
    let request = LyricRequest::new(long_text())
        .with_bpm(96)
        .with_scheme(RhymeScheme::Aabb);
    c.bench_function("pipeline_aabb_50_verses", |b| {
        b.iter(|| pipeline.process(black_box(&request), &mut FirstCandidate))
    });
}

fn bench_batch(c: &mut Criterion) {
    let pipeline = LyricPipeline::with_source(LyricConfig::default(), default_dictionary());
    let requests: Vec<LyricRequest> = (0..64)
        .map(|i| {
            LyricRequest::new(VERSE)
                .with_bpm(60 + i)
                .with_scheme(RhymeScheme::Abab)
        })
        .collect();
    c.bench_function("batch_64_verses", |b| {
        b.iter(|| pipeline.process_batch(black_box(&requests), 7))
    });
}

criterion_group!(benches, bench_segment, bench_pipeline, bench_batch);
criterion_main!(benches);
