//! Benchmarks for line splitting, cached queries and table extraction
//!
//! Run with: cargo bench -p odtscan-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use odtscan_core::lines::split_lines;
use odtscan_core::table::extract_table;
use odtscan_core::{plain_text, Document, TableOptions};

/// A body shaped like a written document: headings, paragraphs with spans,
/// empty lines and one three-column table.
fn sample_body(rows: usize) -> String {
    let mut body = String::new();
    body.push_str("<text:h text:style-name=\"Heading_20_1\" text:outline-level=\"1\">Schedule</text:h>");
    body.push_str("<text:p text:style-name=\"P1\">Audio:<text:span text:style-name=\"T1\">https://localhost:7001/music/track.mp3</text:span></text:p>");
    body.push_str("<text:p text:style-name=\"Standard\"/>");
    body.push_str(
        "<table:table table:name=\"Table1\" table:style-name=\"Table1\">\
         <table:table-column table:style-name=\"Table1.A\" table:number-columns-repeated=\"3\"/>",
    );
    for i in 0..rows {
        body.push_str("<table:table-row>");
        for text in [format!("{:02}:00", i % 60), "Du rufst mich".to_string(), "You called me".to_string()] {
            body.push_str("<table:table-cell table:style-name=\"Table1.A1\" office:value-type=\"string\">");
            body.push_str("<text:p text:style-name=\"P2\">");
            body.push_str(&text);
            body.push_str("</text:p></table:table-cell>");
        }
        body.push_str("</table:table-row>");
    }
    body.push_str("</table:table>");
    for i in 0..rows {
        body.push_str("<text:p text:style-name=\"P1\">Paragraph <text:span text:style-name=\"T2\">");
        body.push_str(&i.to_string());
        body.push_str("</text:span> of the closing notes.</text:p>");
    }
    body
}

fn bench_split(c: &mut Criterion) {
    let body = sample_body(150);
    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Bytes(body.len() as u64));

    group.bench_function("split_lines", |b| {
        b.iter(|| black_box(split_lines(black_box(&body)).len()))
    });

    group.bench_function("plain_text", |b| {
        b.iter(|| black_box(plain_text(black_box(&body)).len()))
    });

    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let body = sample_body(150);
    let doc = Document::new(body.as_str());
    let raw = doc.raw_table(0).unwrap_or_default().to_string();

    let mut group = c.benchmark_group("table");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("plain", |b| {
        b.iter(|| {
            let table = extract_table(black_box(&raw), TableOptions::default()).unwrap();
            black_box(table.row_count())
        })
    });

    group.bench_function("raw", |b| {
        b.iter(|| {
            let table = extract_table(black_box(&raw), TableOptions::new().raw_cells(true)).unwrap();
            black_box(table.row_count())
        })
    });

    group.finish();
}

fn bench_cached_queries(c: &mut Criterion) {
    let doc = Document::new(sample_body(150));
    // warm the cache
    doc.line_count();

    c.bench_function("line_index_of", |b| {
        b.iter(|| black_box(doc.line_index_of(black_box("closing notes"), 100)))
    });

    c.bench_function("nth_table", |b| {
        b.iter(|| black_box(doc.raw_table(black_box(0)).map(str::len)))
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for rows in [10, 100, 1000].iter() {
        let body = sample_body(*rows);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::new("document", rows), &body, |b, body| {
            b.iter(|| {
                let doc = Document::new(body.as_str());
                let table = doc.table(0, TableOptions::default()).unwrap();
                black_box((doc.line_count(), table.row_count()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_split, bench_table, bench_cached_queries, bench_scaling);
criterion_main!(benches);
