//! Performance benchmarks for day file parsing and rewriting.
//!
//! Run with: cargo bench
//!
//! These benchmarks establish baseline performance metrics for:
//! - Parsing day files with a growing number of entries
//! - Appending an entry (re-render plus re-parse)
//! - Setting a frontmatter field

use chrono::{NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use daylog::document::{DailyDocument, JournalEntry, TimePrecision};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 29).expect("valid date")
}

/// A day file with the default frontmatter, a memo and `entries` entries.
fn day_file(entries: usize) -> String {
    let mut text = String::from(
        "---\ndate: \"2025-12-29T06:00:00+09:00\"\ntags:\n- \"daily\"\nwake_time: null\n\
         morning: []\nlunch: []\nreading_min: 0\n---\n\n## Memo\nSome notes.\n\n## Journal\n",
    );
    for i in 0..entries {
        text.push_str(&format!(
            "- {:02}:{:02} entry number {} #tag\n    with a second line\n",
            (i / 60) % 24,
            i % 60,
            i
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for count in [10, 100, 1000] {
        let text = day_file(count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| {
                let doc = DailyDocument::parse(date(), black_box(text.as_str()), TimePrecision::Minutes);
                black_box(doc);
            });
        });
    }

    group.finish();
}

fn bench_add_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_entry");
    let entry = JournalEntry::new(
        date(),
        NaiveTime::from_hms_opt(23, 59, 0).expect("valid time"),
        "Late note",
    );

    for count in [10, 100, 1000] {
        let doc = DailyDocument::parse(date(), day_file(count), TimePrecision::Minutes);
        group.bench_with_input(BenchmarkId::from_parameter(count), &doc, |b, doc| {
            b.iter(|| black_box(doc.add_entry(black_box(&entry))));
        });
    }

    group.finish();
}

fn bench_set_field(c: &mut Criterion) {
    let doc = DailyDocument::parse(date(), day_file(100), TimePrecision::Minutes);
    c.bench_function("set_field_value", |b| {
        b.iter(|| black_box(doc.set_field_value(black_box("wake_time"), "07:15")));
    });
}

criterion_group!(benches, bench_parse, bench_add_entry, bench_set_field);
criterion_main!(benches);
