//! Segmentation benchmarks.
//!
//! Streaming re-segments the whole buffer after every chunk, so the cost
//! that matters is the sum over all prefixes of a reply.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use stream_gen::core::SyntaxMode;
use stream_gen::segment::Segmenter;
use stream_gen::stream::{Preset, StreamSession, tokenize};

fn bench_every_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_every_prefix");
    for syntax in SyntaxMode::all() {
        let content = Preset::Multi.content(syntax);
        let segmenter = Segmenter::for_syntax(syntax);
        let ends: Vec<usize> = content.char_indices().map(|(i, _)| i).skip(1).collect();

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(syntax), &ends, |b, ends| {
            b.iter(|| {
                for &end in ends {
                    black_box(segmenter.segment(black_box(&content[..end])));
                }
            });
        });
    }
    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_tokens");
    for syntax in SyntaxMode::all() {
        let content = Preset::Multi.content(syntax);
        let tokens = tokenize(content);

        group.bench_with_input(BenchmarkId::from_parameter(syntax), &tokens, |b, tokens| {
            b.iter(|| {
                let mut session = StreamSession::for_syntax(syntax);
                for token in tokens {
                    let _ = black_box(session.push(token));
                }
                black_box(session.finish().entity_count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_every_prefix, bench_session);
criterion_main!(benches);
