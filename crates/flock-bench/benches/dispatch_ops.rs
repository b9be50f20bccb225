//! Criterion micro-benchmarks for the three dispatch decompositions on a
//! position push kernel.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use flock_bench::{kinematics_profile, POSITION, VELOCITY};
use flock_core::{Orientation, RandomAccess};
use flock_parallel::{
    parallel_for, parallel_for_default, ArrayParallel, RangePolicy, StructAndArrayParallel,
    StructParallel,
};

const N: usize = 100_000;
const DT: f64 = 1e-3;

/// Benchmark: x += v·dt over 100K particles with each tag.
fn bench_push(c: &mut Criterion) {
    let aosoa = kinematics_profile::<16>(N, Orientation::ColumnMajor);
    let range = RangePolicy::from_storage(&aosoa);
    let position = aosoa.slice::<[f64; 3]>(POSITION).unwrap();
    let velocity = aosoa
        .slice_with::<[f64; 3], RandomAccess>(VELOCITY)
        .unwrap();

    let mut group = c.benchmark_group("push_100k");

    group.bench_function("array_parallel", |b| {
        b.iter(|| {
            parallel_for(
                &range,
                |p: usize| {
                    for d in 0..3 {
                        let v = velocity.at(p, [d]);
                        position.at(p, [d]).update(|x| x + v * DT);
                    }
                },
                ArrayParallel,
            );
        });
    });

    group.bench_function("struct_parallel", |b| {
        b.iter(|| {
            parallel_for(
                &range,
                |s: usize| {
                    for d in 0..3 {
                        for i in 0..range.array_size(s) {
                            let v = velocity.access(s, i, [d]);
                            position.access(s, i, [d]).update(|x| x + v * DT);
                        }
                    }
                },
                StructParallel,
            );
        });
    });

    group.bench_function("struct_and_array_parallel", |b| {
        b.iter(|| {
            parallel_for(
                &range,
                |s: usize, i: usize| {
                    for d in 0..3 {
                        let v = velocity.access(s, i, [d]);
                        position.access(s, i, [d]).update(|x| x + v * DT);
                    }
                },
                StructAndArrayParallel,
            );
        });
    });

    group.bench_function("default", |b| {
        b.iter(|| {
            parallel_for_default(&range, |p| {
                for d in 0..3 {
                    let v = velocity.at(p, [d]);
                    position.at(p, [d]).update(|x| x + v * DT);
                }
            });
        });
    });

    group.finish();
    black_box(position.at(0, [0]).get());
}

criterion_group!(benches, bench_push);
criterion_main!(benches);
