use criterion::{criterion_group, criterion_main};

mod benchmarks;
use benchmarks::progression::{course_benchmarks, pathogen_benchmarks, trial_benchmarks};

criterion_group!(
    progression_benches,
    pathogen_benchmarks,
    course_benchmarks,
    trial_benchmarks,
);

criterion_main!(progression_benches);
