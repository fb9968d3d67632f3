use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use mixwise::{
    config::Config,
    features::{CamelotKey, EnergyDirection, Mode, TrackFeatures},
    library::InMemoryLibrary,
    recommend::{CandidateRanker, RecommendationRequest},
};

const EMBEDDING_DIM: usize = 32;

fn synthetic_library(size: usize) -> InMemoryLibrary {
    let mut rng = SmallRng::seed_from_u64(0x5eed);

    let tracks = (0..size)
        .map(|i| {
            let mut track = TrackFeatures::unanalyzed(format!("track-{:06}", i));
            // Roughly one in ten tracks is only partially analyzed
            if rng.gen_bool(0.9) {
                let mode = if rng.gen_bool(0.5) { Mode::Minor } else { Mode::Major };
                if let Some(key) = CamelotKey::new(rng.gen_range(1..=12), mode) {
                    track = track.with_key(key);
                }
                track = track
                    .with_bpm(rng.gen_range(70.0..180.0))
                    .with_energy(rng.gen_range(0.0..=1.0))
                    .with_embedding((0..EMBEDDING_DIM).map(|_| rng.gen_range(-1.0..1.0)).collect());
            }
            track
        })
        .collect();

    InMemoryLibrary::from_features(tracks).expect("synthetic ids are unique")
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [1_000, 10_000, 50_000] {
        let library = synthetic_library(size);

        let mut sequential = Config::default();
        sequential.ranking.parallel_threshold = usize::MAX;
        let mut parallel = Config::default();
        parallel.ranking.parallel_threshold = 1;

        let request = RecommendationRequest::new("track-000000")
            .with_direction(EnergyDirection::Build)
            .with_limit(25);

        for (name, config) in [("sequential", sequential), ("parallel", parallel)] {
            let ranker = CandidateRanker::new(library.clone(), &config).expect("valid config");
            group.bench_with_input(BenchmarkId::new(name, size), &request, |b, request| {
                b.iter(|| ranker.recommend(black_box(request)).expect("source exists"))
            });
        }
    }

    group.finish();
}

fn bench_harmonic_filter(c: &mut Criterion) {
    let ranker = CandidateRanker::new(synthetic_library(10_000), &Config::default()).expect("valid config");
    let request = RecommendationRequest::new("track-000001").harmonic_only().bpm_window_only();

    c.bench_function("recommend_harmonic_window_10k", |b| {
        b.iter(|| ranker.recommend(black_box(&request)).expect("source exists"))
    });
}

criterion_group!(benches, bench_recommend, bench_harmonic_filter);
criterion_main!(benches);
