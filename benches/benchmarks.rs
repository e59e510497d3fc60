//! Performance benchmarks for Blogsmith.
//!
//! Covers the hot text-shaping paths: source deduplication/formatting and
//! section plan parsing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use blogsmith::search::{dedupe_and_format_sources, SearchResult};
use blogsmith::workflow::parse_section_plan;

/// Generate synthetic search results with some duplicate URLs.
fn generate_results(count: usize) -> Vec<SearchResult> {
    (0..count)
        .map(|index| SearchResult {
            title: format!("Result {index}"),
            url: format!("https://example.com/page/{}", index % (count / 2 + 1)),
            content: format!("Summary of result {index} with enough text to format."),
            score: 0.5,
            raw_content: Some("lorem ipsum dolor sit amet ".repeat(200)),
            source_type: "tavily".to_string(),
            query: "benchmark query".to_string(),
            crawled_at: "2025-01-01T00:00:00+00:00".to_string(),
        })
        .collect()
}

/// Generate a synthetic numbered section plan.
fn generate_plan(sections: usize) -> String {
    (1..=sections)
        .map(|index| {
            format!(
                "{index}. Section {index}\nA description of section {index} spanning\nmultiple lines of planner output."
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_format_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_sources");

    for size in [10, 50, 200] {
        let results = generate_results(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &results, |b, results| {
            b.iter(|| dedupe_and_format_sources(black_box(results), 1000, true));
        });
    }

    group.finish();
}

fn bench_parse_section_plan(c: &mut Criterion) {
    let plan = generate_plan(8);
    c.bench_function("parse_section_plan", |b| {
        b.iter(|| parse_section_plan(black_box(&plan)));
    });
}

criterion_group!(benches, bench_format_sources, bench_parse_section_plan);
criterion_main!(benches);
