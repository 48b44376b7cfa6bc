use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use themap::{
    assign_themes_with_configs, build_embedder, cluster, embed_documents, project, ClusterConfig,
    EmbedConfig, Metric, ReduceConfig, ThemeTable,
};

/// Synthetic event notes: a handful of recurring phrasings with a
/// counter, roughly what a cleaned dataset column looks like.
fn synthetic_notes(count: usize) -> Vec<String> {
    let templates = [
        "tractor convoy blocks the ring road",
        "dock workers walk out over pay",
        "students rally against housing shortage",
        "sea dike march for climate targets",
        "nurses picket the regional hospital",
    ];
    (0..count)
        .map(|i| format!("{} round {}", templates[i % templates.len()], i / templates.len()))
        .collect()
}

fn embed_config() -> EmbedConfig {
    EmbedConfig::new().with_embedding_dim(64)
}

fn reduce_config() -> ReduceConfig {
    ReduceConfig::new()
        .with_metric(Metric::Euclidean)
        .with_n_neighbors(10)
        .with_n_components(2)
        .with_n_epochs(50)
}

fn cluster_config() -> ClusterConfig {
    ClusterConfig::new().with_min_cluster_size(10)
}

fn bench_embed(c: &mut Criterion) {
    let cfg = embed_config();
    let embedder = build_embedder(&cfg).expect("embedder");
    let mut group = c.benchmark_group("embed");

    for count in [100usize, 1000] {
        let notes = synthetic_notes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("documents_{count}"), |b| {
            b.iter(|| {
                let vectors = embed_documents(&embedder, black_box(&notes), &cfg)
                    .expect("embed should succeed");
                black_box(vectors);
            });
        });
    }

    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let embed_cfg = embed_config();
    let embedder = build_embedder(&embed_cfg).expect("embedder");
    let notes = synthetic_notes(200);
    let vectors = embed_documents(&embedder, &notes, &embed_cfg).expect("embed");
    let reduce_cfg = reduce_config();

    c.bench_function("reduce_project_200", |b| {
        b.iter(|| {
            let projected =
                project(black_box(&vectors), &reduce_cfg).expect("projection should succeed");
            black_box(projected);
        });
    });
}

fn bench_cluster(c: &mut Criterion) {
    let embed_cfg = embed_config();
    let embedder = build_embedder(&embed_cfg).expect("embedder");
    let notes = synthetic_notes(200);
    let vectors = embed_documents(&embedder, &notes, &embed_cfg).expect("embed");
    let projected = project(&vectors, &reduce_config()).expect("project");
    let cluster_cfg = cluster_config();

    c.bench_function("cluster_200", |b| {
        b.iter(|| {
            let labels =
                cluster(black_box(&projected), &cluster_cfg).expect("clustering should succeed");
            black_box(labels);
        });
    });
}

fn bench_full_assignment(c: &mut Criterion) {
    let embed_cfg = embed_config();
    let embedder = build_embedder(&embed_cfg).expect("embedder");
    let notes = synthetic_notes(200);
    let reduce_cfg = reduce_config();
    let cluster_cfg = cluster_config();
    let themes = ThemeTable::default();

    c.bench_function("assign_themes_200", |b| {
        b.iter(|| {
            let assignment = assign_themes_with_configs(
                black_box(&notes),
                &embedder,
                &embed_cfg,
                &reduce_cfg,
                &cluster_cfg,
                &themes,
            )
            .expect("assignment should succeed");
            black_box(assignment);
        });
    });
}

criterion_group!(
    pipeline_benches,
    bench_embed,
    bench_reduce,
    bench_cluster,
    bench_full_assignment
);
criterion_main!(pipeline_benches);
