//! Kernel dispatch over a [`RangePolicy`].

use std::ops::Range;

use flock_core::Index;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::policy::RangePolicy;
use crate::tag::{DispatchTag, StructAndArrayParallel};

/// Run `op` over `policy` with the decomposition selected by `tag`.
///
/// Returns after every invocation has completed. Invocation order is
/// unspecified; kernels writing shared elements must use atomic access.
///
/// ```
/// use flock_parallel::{parallel_for, RangePolicy, StructParallel};
/// use flock_slice::AoSoA;
///
/// let particles = AoSoA::<8>::builder().member::<f64>("mass").build(20).unwrap();
/// let mass = particles.slice::<f64>(0).unwrap();
/// let range = RangePolicy::from_storage(&particles);
///
/// parallel_for(
///     &range,
///     |s: usize| {
///         for i in 0..range.array_size(s) {
///             mass.access(s, i, []).set(1.0);
///         }
///     },
///     StructParallel,
/// );
/// assert_eq!(mass.at(19, []).get(), 1.0);
/// ```
pub fn parallel_for<const V: usize, F, T>(policy: &RangePolicy<V>, op: F, _tag: T)
where
    T: DispatchTag<V, F>,
{
    tracing::trace!(
        tag = T::NAME,
        begin = policy.begin(),
        end = policy.end(),
        num_structs = policy.num_structs(),
        "parallel_for"
    );
    T::dispatch(policy, &op);
}

/// Run a per-particle kernel `op(p)` with the (struct, lane) decomposition.
pub fn parallel_for_default<const V: usize, F>(policy: &RangePolicy<V>, op: F)
where
    F: Fn(usize) + Send + Sync,
{
    parallel_for(
        policy,
        |s: usize, i: usize| op(Index::<V>::p(s, i)),
        StructAndArrayParallel,
    );
}

/// Call `f` once for every index in `range`, in parallel when enabled.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_index<F>(range: Range<usize>, f: &F)
where
    F: Fn(usize) + Send + Sync + ?Sized,
{
    range.into_par_iter().for_each(f);
}

/// Call `f` once for every index in `range`, in parallel when enabled.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_index<F>(range: Range<usize>, f: &F)
where
    F: Fn(usize) + Send + Sync + ?Sized,
{
    range.for_each(f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{ArrayParallel, StructParallel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counters(n: usize) -> Vec<AtomicUsize> {
        (0..n).map(|_| AtomicUsize::new(0)).collect()
    }

    fn counts(counters: &[AtomicUsize]) -> Vec<usize> {
        counters.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    #[test]
    fn array_parallel_visits_each_particle_once() {
        let range = RangePolicy::<4>::new(4, 14).unwrap();
        let hits = counters(16);
        parallel_for(
            &range,
            |p: usize| {
                hits[p].fetch_add(1, Ordering::Relaxed);
            },
            ArrayParallel,
        );
        let expected: Vec<usize> = (0..16).map(|p| usize::from((4..14).contains(&p))).collect();
        assert_eq!(counts(&hits), expected);
    }

    #[test]
    fn struct_parallel_visits_each_struct_once() {
        let range = RangePolicy::<4>::new(4, 14).unwrap();
        let hits = counters(5);
        parallel_for(
            &range,
            |s: usize| {
                hits[s].fetch_add(1, Ordering::Relaxed);
            },
            StructParallel,
        );
        assert_eq!(counts(&hits), [0, 1, 1, 1, 0]);
    }

    #[test]
    fn struct_and_array_skips_tail_lanes() {
        let range = RangePolicy::<4>::new(0, 10).unwrap();
        let hits = counters(12);
        parallel_for(
            &range,
            |s: usize, i: usize| {
                assert!(i < range.array_size(s));
                hits[s * 4 + i].fetch_add(1, Ordering::Relaxed);
            },
            StructAndArrayParallel,
        );
        assert_eq!(counts(&hits), [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn default_dispatch_maps_back_to_particles() {
        let range = RangePolicy::<8>::new(0, 21).unwrap();
        let hits = counters(21);
        parallel_for_default(&range, |p| {
            hits[p].fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(counts(&hits), vec![1; 21]);
    }

    #[test]
    fn empty_range_never_invokes() {
        let range = RangePolicy::<8>::new(16, 16).unwrap();
        let calls = AtomicUsize::new(0);
        let count = |_: usize| {
            calls.fetch_add(1, Ordering::Relaxed);
        };
        parallel_for(&range, count, ArrayParallel);
        parallel_for(&range, count, StructParallel);
        parallel_for(
            &range,
            |_: usize, _: usize| {
                calls.fetch_add(1, Ordering::Relaxed);
            },
            StructAndArrayParallel,
        );
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
