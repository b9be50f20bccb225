//! Benchmark profiles for the flock particle layout engine.
//!
//! - [`kinematics_profile`]: position/velocity/mass collection for push
//!   kernels
//! - [`shuffled_order`]: deterministic random particle visit order via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use flock_core::Orientation;
use flock_parallel::{parallel_for_default, RangePolicy};
use flock_slice::AoSoA;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Member index of the `[f64; 3]` position.
pub const POSITION: usize = 0;
/// Member index of the `[f64; 3]` velocity.
pub const VELOCITY: usize = 1;
/// Member index of the `f64` mass.
pub const MASS: usize = 2;

/// Build an `n`-particle collection with position, velocity and mass,
/// velocities and masses initialised to deterministic non-zero values.
pub fn kinematics_profile<const V: usize>(n: usize, orientation: Orientation) -> AoSoA<V> {
    let aosoa = AoSoA::<V>::builder()
        .member::<[f64; 3]>("position")
        .member::<[f64; 3]>("velocity")
        .member::<f64>("mass")
        .orientation(orientation)
        .build(n)
        .expect("kinematics schema is valid");

    let velocity = aosoa
        .slice::<[f64; 3]>(VELOCITY)
        .expect("velocity member");
    let mass = aosoa.slice::<f64>(MASS).expect("mass member");
    parallel_for_default(&RangePolicy::from_storage(&aosoa), |p| {
        for d in 0..3 {
            velocity.at(p, [d]).set(1.0 + (p % 7 + d) as f64 * 0.125);
        }
        mass.at(p, []).set(1.0 + (p % 3) as f64);
    });
    aosoa
}

/// A permutation of `0..n`, reproducible from `seed`.
pub fn shuffled_order(n: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    order
}
