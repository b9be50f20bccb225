//! Dispatch tags: the three work decompositions of a [`RangePolicy`].

use std::fmt;

use crate::dispatch::for_each_index;
use crate::policy::RangePolicy;

/// One invocation per particle: `op(p)` for every `p` in `[begin, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayParallel;

/// One invocation per struct block: `op(s)` for every
/// `s` in `[struct_begin, struct_end)`. The kernel loops over lanes itself,
/// bounded by the range's `array_size(s)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StructParallel;

/// One invocation per valid `(struct, lane)` pair: `op(s, i)` with
/// `i < array_size(s)`. Lanes past the end of a partial struct are never
/// visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StructAndArrayParallel;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ArrayParallel {}
    impl Sealed for super::StructParallel {}
    impl Sealed for super::StructAndArrayParallel {}
}

/// A work decomposition for kernels of type `F`.
///
/// Sealed: implemented only by the three tags of this crate, each for the
/// kernel signature it invokes.
pub trait DispatchTag<const V: usize, F>: sealed::Sealed + Copy + fmt::Debug {
    /// Tag name used in trace events.
    const NAME: &'static str;

    /// Invoke `op` once for every unit of work in `policy`.
    fn dispatch(policy: &RangePolicy<V>, op: &F);
}

impl<const V: usize, F> DispatchTag<V, F> for ArrayParallel
where
    F: Fn(usize) + Send + Sync,
{
    const NAME: &'static str = "array_parallel";

    fn dispatch(policy: &RangePolicy<V>, op: &F) {
        for_each_index(policy.begin()..policy.end(), op);
    }
}

impl<const V: usize, F> DispatchTag<V, F> for StructParallel
where
    F: Fn(usize) + Send + Sync,
{
    const NAME: &'static str = "struct_parallel";

    fn dispatch(policy: &RangePolicy<V>, op: &F) {
        for_each_index(policy.struct_begin()..policy.struct_end(), op);
    }
}

impl<const V: usize, F> DispatchTag<V, F> for StructAndArrayParallel
where
    F: Fn(usize, usize) + Send + Sync,
{
    const NAME: &'static str = "struct_and_array_parallel";

    fn dispatch(policy: &RangePolicy<V>, op: &F) {
        for_each_index(policy.struct_begin()..policy.struct_end(), &|s| {
            for_each_index(0..policy.array_size(s), &|i| op(s, i));
        });
    }
}
