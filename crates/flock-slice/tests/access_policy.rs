//! Access policy integration tests: random-order reads, atomic updates
//! from many threads, and policy re-casts over one collection.

use std::thread;

use flock_core::{AtomicAccess, Orientation, RandomAccess};
use flock_slice::AoSoA;
use flock_test_utils::{fixture_aosoa, FixtureSlices, FixtureValues, Mat2, Vec1, FLAG, MAT2, VEC1};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn random_access_reads_in_shuffled_order() {
    let aosoa = fixture_aosoa::<16>(155, Orientation::ColumnMajor);
    let slices = FixtureSlices::new(&aosoa);
    let values = FixtureValues::new(0.75, 2.0, 11);
    for p in 0..155 {
        slices.write_particle(p, &values);
    }

    let mat2 = aosoa.slice_with::<Mat2, RandomAccess>(MAT2).unwrap();
    let mut order: Vec<usize> = (0..155).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    order.shuffle(&mut rng);
    for &p in &order {
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(mat2.at(p, [i, j]), values.mat2(i, j));
            }
        }
    }
}

#[test]
fn random_access_values_are_copies() {
    let aosoa = fixture_aosoa::<8>(10, Orientation::RowMajor);
    let flag = aosoa.slice::<i32>(FLAG).unwrap();
    flag.at(3, []).set(5);

    let read_only = flag.read_only();
    let mut copy = read_only.at(3, []);
    copy += 1;
    assert_eq!(copy, 6);
    assert_eq!(read_only.at(3, []), 5);
}

#[test]
fn atomic_adds_from_many_threads() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 250;

    let aosoa = AoSoA::<8>::builder()
        .member::<u64>("hits")
        .member::<[f64; 2]>("weight")
        .build(20)
        .unwrap();
    let hits = aosoa.slice_with::<u64, AtomicAccess>(0).unwrap();
    let weight = aosoa.slice_with::<[f64; 2], AtomicAccess>(1).unwrap();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    for p in 0..20 {
                        hits.at(p, []).fetch_add(1);
                        weight.at(p, [1]).fetch_add(0.5);
                    }
                }
            });
        }
    });

    for p in 0..20 {
        assert_eq!(hits.at(p, []).load(), (THREADS * ROUNDS) as u64);
        assert_eq!(weight.at(p, [1]).load(), 0.5 * (THREADS * ROUNDS) as f64);
        assert_eq!(weight.at(p, [0]).load(), 0.0);
    }
}

#[test]
fn atomic_fetch_update_accumulates_maximum() {
    let aosoa = AoSoA::<4>::builder().member::<i64>("peak").build(1).unwrap();
    let peak = aosoa.slice_with::<i64, AtomicAccess>(0).unwrap();

    thread::scope(|scope| {
        for t in 0..6i64 {
            scope.spawn(move || {
                for v in 0..100 {
                    peak.at(0, []).fetch_update(|cur| cur.max(t * 1000 + v));
                }
            });
        }
    });
    assert_eq!(peak.at(0, []).load(), 5099);
}

#[test]
fn default_access_writes_distinct_particles_from_threads() {
    let aosoa = fixture_aosoa::<16>(64, Orientation::RowMajor);
    let vec1 = aosoa.slice::<Vec1>(VEC1).unwrap();

    thread::scope(|scope| {
        for chunk in 0..4 {
            scope.spawn(move || {
                for p in chunk * 16..(chunk + 1) * 16 {
                    vec1.at(p, [0]).set(p as f64);
                    vec1.at(p, [2]).update(|v| v + 2.0);
                }
            });
        }
    });

    let read_only = vec1.read_only();
    for p in 0..64 {
        assert_eq!(read_only.at(p, [0]), p as f64);
        assert_eq!(read_only.at(p, [1]), 0.0);
        assert_eq!(read_only.at(p, [2]), 2.0);
    }
}

#[test]
fn cast_round_trips_between_policies() {
    let aosoa = fixture_aosoa::<16>(35, Orientation::ColumnMajor);
    let flag = aosoa.slice::<i32>(FLAG).unwrap();
    // SAFETY: collection storage is writable and 8-byte aligned, and the
    // default-access slice is not used while the atomic handles are.
    let atomic = unsafe { flag.cast::<AtomicAccess>() };
    for p in 0..35 {
        atomic.at(p, []).store(p as i32);
    }
    // SAFETY: the atomic handles are no longer in use.
    let back = unsafe { atomic.cast::<flock_core::DefaultAccess>() };
    for p in 0..35 {
        assert_eq!(back.at(p, []).replace(-1), p as i32);
        assert_eq!(flag.at(p, []).get(), -1);
    }
    assert_eq!(back.layout(), flag.layout());
}
