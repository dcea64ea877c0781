use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parsers::{parse_java, ParseStrategy};
use std::path::{Path, PathBuf};

use engine::{run, EngineConfig};
use ir::CompilationUnit;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/java/shapes")
}

fn java_sources(root: &Path) -> Vec<PathBuf> {
    loader::collect_sources(root, &|_: &Path| false, &|p: &Path| {
        parsers::detect_type(p) == Some("java")
    })
    .expect("collect fixtures")
}

fn parsed_units() -> Vec<CompilationUnit> {
    java_sources(&fixture_root())
        .iter()
        .map(|p| {
            let src = loader::read_source(p).expect("read fixture");
            parse_java(&src.content, &p.to_string_lossy(), ParseStrategy::Strict)
                .expect("parse fixture")
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let file = fixture_root().join("geo/Circle.java");
    let content = std::fs::read_to_string(&file).expect("read file");
    c.bench_function("parse_java_strict", |b| {
        b.iter(|| parse_java(black_box(&content), "Circle.java", ParseStrategy::Strict).unwrap())
    });
    c.bench_function("parse_java_tolerant", |b| {
        b.iter(|| parse_java(black_box(&content), "Circle.java", ParseStrategy::Tolerant).unwrap())
    });
}

fn bench_passes(c: &mut Criterion) {
    let units = parsed_units();
    c.bench_function("two_passes_shapes", |b| {
        b.iter(|| run(black_box(&units), EngineConfig::default(), Vec::new()))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let app = run(&parsed_units(), EngineConfig::default(), Vec::new());
    let coordinates: Vec<String> = ["geo.Circle.Builder", "geo.Shape.PI", "app.Main.main", "geo.Missing"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    c.bench_function("lookup_coordinates", |b| {
        b.iter(|| app.find_all_by_unique_coordinates(black_box(&coordinates)))
    });
}

fn bench_analyze_files(c: &mut Criterion) {
    let files = java_sources(&fixture_root());
    c.bench_function("analyze_files_shapes", |b| {
        b.iter(|| engine::analyze_files(black_box(&files), EngineConfig::default(), Vec::new()))
    });
}

criterion_group!(benches, bench_parse, bench_passes, bench_lookup, bench_analyze_files);
criterion_main!(benches);
