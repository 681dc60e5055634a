use criterion::Criterion;
use epi_progression::{
    outcomes::{run_course, DEFAULT_MAX_DAYS},
    random::stream_rng,
    trial::run_trial,
    Individual, Pathogen,
};
use std::hint::black_box;

const KNOWN_CODE: u32 = 0x00FF_FF33;

pub fn pathogen_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathogen");

    group.bench_function("from_code", |b| {
        b.iter(|| black_box(Pathogen::new(black_box(KNOWN_CODE))));
    });

    group.bench_function("random", |b| {
        let mut rng = stream_rng(0, "bench", 0);
        b.iter(|| black_box(Pathogen::random(&mut rng)));
    });

    group.finish();
}

pub fn course_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("course");
    let pathogen = Pathogen::new(KNOWN_CODE).expect("Valid generator code");

    group.bench_function("known_pathogen", |b| {
        let mut rng = stream_rng(0, "bench", 1);
        b.iter(|| {
            let mut individual = Individual::new(&mut rng);
            individual.infect(&pathogen);
            black_box(run_course(&mut individual, &mut rng, DEFAULT_MAX_DAYS))
        });
    });

    group.bench_function("random_pathogen", |b| {
        let mut rng = stream_rng(0, "bench", 2);
        b.iter(|| {
            let pathogen = Pathogen::random(&mut rng);
            let mut individual = Individual::new(&mut rng);
            individual.infect(&pathogen);
            black_box(run_course(&mut individual, &mut rng, DEFAULT_MAX_DAYS))
        });
    });

    group.finish();
}

pub fn trial_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial");
    let pathogen = Pathogen::new(KNOWN_CODE).expect("Valid generator code");

    for population in [100, 1_000] {
        group.bench_function(format!("population_{population}"), |b| {
            let mut rng = stream_rng(0, "bench", 3);
            b.iter(|| {
                black_box(run_trial(
                    &pathogen,
                    black_box(population),
                    None,
                    DEFAULT_MAX_DAYS,
                    &mut rng,
                ))
            });
        });
    }

    group.finish();
}
