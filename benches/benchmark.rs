// Throughput benchmarks for the detection pipeline
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqsift::{
    to_csv_bytes, ClusterLabelMap, ClusterModel, Detector, FeatureAligner, FeatureVocabulary,
    ModelArtifacts, RawTable, ScalerState, Value,
};
use std::sync::Arc;

const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "HEAD"];

fn vocabulary() -> FeatureVocabulary {
    let mut columns = vec!["bytes".to_string(), "latency_ms".to_string()];
    columns.extend(METHODS.iter().map(|m| format!("method_{}", m)));
    columns.push("method_Other".to_string());
    columns.extend((0..20).map(|i| format!("path_/api/v{}", i)));
    columns.push("path_Other".to_string());
    FeatureVocabulary::new(columns).unwrap()
}

fn detector(rng: &mut StdRng) -> Detector {
    let vocab = vocabulary();
    let dim = vocab.len();
    let centroids: Vec<Vec<f64>> = (0..8)
        .map(|_| (0..dim).map(|_| rng.random_range(-2.0..2.0)).collect())
        .collect();
    let mean: Vec<f64> = (0..dim).map(|_| rng.random_range(0.0..1.0)).collect();
    let scale: Vec<f64> = (0..dim).map(|_| rng.random_range(0.5..2.0)).collect();

    let artifacts = ModelArtifacts::new(
        vocab,
        ScalerState::new(mean, scale).unwrap(),
        ClusterModel::new(centroids).unwrap(),
        ClusterLabelMap::new((0..8).map(|i| (i, if i == 0 { "bad" } else { "good" }))),
    )
    .unwrap();
    Detector::new(Arc::new(artifacts))
}

fn generate_table(rng: &mut StdRng, rows: usize) -> RawTable {
    let columns = vec![
        "ip".to_string(),
        "method".to_string(),
        "path".to_string(),
        "bytes".to_string(),
        "latency_ms".to_string(),
    ];
    let rows = (0..rows)
        .map(|_| {
            vec![
                Value::from(format!(
                    "10.{}.{}.{}",
                    rng.random_range(0..4),
                    rng.random_range(0..256),
                    rng.random_range(0..256)
                )),
                Value::from(METHODS[rng.random_range(0..METHODS.len())]),
                Value::from(format!("/api/v{}", rng.random_range(0..40))),
                Value::Number(rng.random_range(0.0..100000.0)),
                Value::Number(rng.random_range(0.0..500.0)),
            ]
        })
        .collect();
    RawTable::from_rows(columns, rows).unwrap()
}

fn benchmark_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");
    let mut rng = StdRng::seed_from_u64(42);
    let vocab = vocabulary();

    for size in [100, 1000, 10000].iter() {
        let table = generate_table(&mut rng, *size);
        group.bench_with_input(BenchmarkId::new("reqsift", size), &table, |b, table| {
            let aligner = FeatureAligner::new(&vocab);
            b.iter(|| black_box(aligner.align(black_box(table)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_csv");
    let mut rng = StdRng::seed_from_u64(42);
    let detector = detector(&mut rng);

    for size in [100, 1000, 10000].iter() {
        let csv = to_csv_bytes(&generate_table(&mut rng, *size)).unwrap();
        group.bench_with_input(BenchmarkId::new("reqsift", size), &csv, |b, csv| {
            b.iter(|| black_box(detector.detect_csv(black_box(csv)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_align, benchmark_detect);
criterion_main!(benches);
