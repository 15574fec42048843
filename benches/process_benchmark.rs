//! Benchmarks for prosemark processing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic thesis-style text.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates synthetic text with the given number of chapters.
fn create_test_text(chapters: usize) -> String {
    let mut text = String::new();
    for i in 0..chapters {
        text.push_str(&format!("CHAPTER {}\n", i + 1));
        text.push_str("INTRODUCTION\n");
        text.push_str(&format!("{}.1 Background of the Study\n", i + 1));
        for _ in 0..5 {
            text.push_str(
                "Education has changed a great deal over the last decade and the \
                 **central** question is how schools adapt to it.\n",
            );
        }
        text.push_str("- first point\n- second point\n- third point\n- fourth point\n\n");
        text.push_str("Table 1: Respondents by age\n");
        text.push_str("Name\tAge\tCity\nJohn\t25\tLondon\nMary\t31\tParis\n\n");
        text.push_str(&format!("{}.2 Scope\n", i + 1));
        text.push_str("Note: the study covers public schools only.\n");
    }
    text.push_str("REFERENCES\nSmith, J. (2020). A study of schools.\n");
    text
}

/// Benchmark input sniffing.
fn bench_format_detection(c: &mut Criterion) {
    let text = create_test_text(1);
    let pdf_data = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n";

    c.bench_function("detect_text", |b| {
        b.iter(|| prosemark::detect_format_from_bytes(black_box(text.as_bytes())));
    });

    c.bench_function("detect_binary", |b| {
        b.iter(|| prosemark::detect_format_from_bytes(black_box(pdf_data)));
    });
}

/// Benchmark classification alone.
fn bench_classification(c: &mut Criterion) {
    let text = create_test_text(10);
    let lines: Vec<&str> = text.lines().collect();
    let classifier = prosemark::LineClassifier::default();

    c.bench_function("classify_10_chapters", |b| {
        b.iter(|| classifier.classify_lines(black_box(&lines)));
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("processing");

    for chapters in [1, 10, 50].iter() {
        let text = create_test_text(*chapters);

        group.bench_function(format!("{}_chapters", chapters), |b| {
            b.iter(|| prosemark::process_text(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark rendering a processed document.
fn bench_rendering(c: &mut Criterion) {
    let doc = prosemark::process_text(&create_test_text(10));
    let options = prosemark::RenderOptions::default().with_toc(true);

    c.bench_function("render_markdown", |b| {
        b.iter(|| prosemark::render::to_markdown(black_box(&doc), &options));
    });

    c.bench_function("render_text", |b| {
        b.iter(|| prosemark::render::to_text(black_box(&doc), &options));
    });
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _builder = prosemark::Prosemark::new()
                .with_toc()
                .with_frontmatter()
                .with_cleanup(prosemark::CleanupPreset::Standard);
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_classification,
    bench_processing,
    bench_rendering,
    bench_builder_creation,
);
criterion_main!(benches);
