//! Tokenizer benchmarks: full scans against memo hits.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mdplay_parser::{IncrementalParser, Tokenizer};

/// Build a document of `sections` repeated sections.
fn document(sections: usize) -> String {
    let section = "## Section\n\nSome **bold**, *italic* and `code` with a [link](https://example.com).\n\
                   - item one\n- item ==two==\n> quoted line\n\n```swift\nlet x = 1\nx + 1\n```\n\n";
    section.repeat(sections)
}

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_parse");
    for sections in [10, 100, 1000] {
        let text = document(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            let tokenizer = Tokenizer::new();
            b.iter(|| tokenizer.parse(black_box(text)))
        });
    }
    group.finish();
}

fn bench_memo_hit(c: &mut Criterion) {
    let text = document(1000);
    let mut parser = IncrementalParser::new();
    parser.parse_if_needed(&text);

    c.bench_function("memo_hit", |b| {
        b.iter(|| parser.parse_if_needed(black_box(&text)).len())
    });
}

fn bench_multibyte(c: &mut Criterion) {
    let text = document(100).replace("Some", "Ünïcödé 日本語");
    let tokenizer = Tokenizer::new();

    c.bench_function("full_parse_multibyte", |b| {
        b.iter(|| tokenizer.parse(black_box(&text)))
    });
}

criterion_group!(benches, bench_full_parse, bench_memo_hit, bench_multibyte);
criterion_main!(benches);
