//! Non-owning, policy-typed views of a single particle member.
//!
//! A [`FieldSlice`] couples a base pointer with the member's [`Layout`] and
//! exposes element access by particle id ([`FieldSlice::at`]) or by explicit
//! struct/inner coordinates ([`FieldSlice::access`]). The raw interface
//! ([`FieldSlice::data`], [`FieldSlice::extent`], [`FieldSlice::stride`])
//! addresses exactly the same elements for external kernels that do their
//! own pointer arithmetic.
//!
//! Bounds are checked with `debug_assert!` only.
//!
//! A read-only slice has no write API:
//!
//! ```compile_fail
//! use flock_core::RandomAccess;
//! use flock_slice::AoSoA;
//!
//! let aosoa = AoSoA::<8>::builder().member::<f32>("mass").build(4).unwrap();
//! let mass = aosoa.slice_with::<f32, RandomAccess>(0).unwrap();
//! mass.at(0, []).set(1.0);
//! ```
//!
//! and cannot be turned back into a writable one without `unsafe`:
//!
//! ```compile_fail
//! use flock_core::{DefaultAccess, RandomAccess};
//! use flock_slice::AoSoA;
//!
//! let aosoa = AoSoA::<8>::builder().member::<f32>("mass").build(4).unwrap();
//! let mass = aosoa.slice_with::<f32, RandomAccess>(0).unwrap();
//! mass.cast::<DefaultAccess>().at(0, []).set(1.0);
//! ```

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use flock_core::{
    AccessPolicy, DefaultAccess, Index, Layout, Member, Orientation, ParticleStorage,
    RandomAccess,
};

use crate::element::ElementAccess;
use crate::error::SliceError;

/// A view of one member of an AoSoA with access policy `P`.
///
/// `'a` is the borrow of the owning storage; the slice never outlives it
/// and never frees it. Slices are `Copy`: handing one to every invocation
/// of a parallel kernel is the intended use.
pub struct FieldSlice<'a, M: Member, const V: usize, P: AccessPolicy = DefaultAccess> {
    data: NonNull<M::Value>,
    layout: Layout,
    num_particle: usize,
    _marker: PhantomData<(&'a M, P)>,
}

// SAFETY: a slice is a pointer into storage borrowed for `'a`. Element
// types are `Send + Sync`; cross-thread write conflicts are excluded by the
// access-policy contract (unsynchronized writes must target distinct
// elements, atomic writes are indivisible, random access never writes).
unsafe impl<M: Member, const V: usize, P: AccessPolicy> Send for FieldSlice<'_, M, V, P> {}
// SAFETY: see `Send`.
unsafe impl<M: Member, const V: usize, P: AccessPolicy> Sync for FieldSlice<'_, M, V, P> {}

impl<M: Member, const V: usize, P: AccessPolicy> Clone for FieldSlice<'_, M, V, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Member, const V: usize, P: AccessPolicy> Copy for FieldSlice<'_, M, V, P> {}

impl<'a, M: Member, const V: usize, P: AccessPolicy> FieldSlice<'a, M, V, P> {
    /// Build a slice over externally owned storage.
    ///
    /// `struct_stride` is the distance between struct blocks in elements of
    /// `M::Value`; `num_soa` must equal `ceil(num_particle / V)`. A null
    /// `data` is accepted only for an empty slice.
    ///
    /// # Safety
    ///
    /// For the whole of `'a`, `data` must point to an allocation that holds
    /// `num_soa * struct_stride` initialised elements of `M::Value`, is
    /// aligned for `M::Value` (and for its atomic type when used with
    /// `AtomicAccess`), permits writes if `P` is writable, and is not moved
    /// or freed.
    pub unsafe fn from_raw_parts(
        data: *mut M::Value,
        num_particle: usize,
        struct_stride: usize,
        num_soa: usize,
        orientation: Orientation,
    ) -> Result<Self, SliceError> {
        let vector_length = Index::<V>::VECTOR_LENGTH;
        let data = match NonNull::new(data) {
            Some(data) => data,
            None if num_particle == 0 => NonNull::dangling(),
            None => return Err(SliceError::NullPointer { num_particle }),
        };
        let expected = Index::<V>::num_soa(num_particle);
        if num_soa != expected {
            return Err(SliceError::SoaCountMismatch {
                expected,
                actual: num_soa,
            });
        }
        let layout = Layout::for_member::<M>(orientation, vector_length, struct_stride, num_soa)?;

        tracing::trace!(
            member = type_name::<M>(),
            policy = P::NAME,
            num_particle,
            num_soa,
            struct_stride,
            ?orientation,
            "field slice created"
        );

        Ok(Self {
            data,
            layout,
            num_particle,
            _marker: PhantomData,
        })
    }

    /// Read-only view of the same storage.
    pub fn read_only(&self) -> FieldSlice<'a, M, V, RandomAccess> {
        // SAFETY: random access only reads, which every policy's contract
        // already permits.
        unsafe { self.cast() }
    }

    /// Re-cast this view under another access policy.
    ///
    /// The new slice addresses the same storage with the same geometry;
    /// `self` is unchanged.
    ///
    /// # Safety
    ///
    /// If `Q` is writable, the storage must permit writes for `'a`. If `Q`
    /// is [`AtomicAccess`](flock_core::AtomicAccess), every element must be
    /// aligned for its atomic type and must not be accessed non-atomically
    /// while atomic handles are in use.
    pub unsafe fn cast<Q: AccessPolicy>(&self) -> FieldSlice<'a, M, V, Q> {
        FieldSlice {
            data: self.data,
            layout: self.layout,
            num_particle: self.num_particle,
            _marker: PhantomData,
        }
    }

    // ── Sizes ─────────────────────────────────────────────────────────

    /// Number of particles, as supplied at construction.
    #[inline(always)]
    pub fn num_particle(&self) -> usize {
        self.num_particle
    }

    /// Number of struct blocks, `ceil(num_particle / V)`.
    #[inline(always)]
    pub fn num_soa(&self) -> usize {
        self.layout.num_soa()
    }

    /// Valid lanes in struct `s`. Undefined for an empty slice.
    #[inline(always)]
    pub fn array_size(&self, s: usize) -> usize {
        Index::<V>::array_size(self.num_particle, s)
    }

    /// Tensor rank of the member (0–4).
    #[inline(always)]
    pub const fn field_rank(&self) -> usize {
        M::RANK
    }

    /// Extent of field dimension `d`, for `d < field_rank()`.
    #[inline(always)]
    pub fn field_extent(&self, d: usize) -> usize {
        debug_assert!(d < M::RANK, "field dimension {d} out of range for rank {}", M::RANK);
        M::EXTENTS[d]
    }

    // ── Raw introspection ─────────────────────────────────────────────

    /// Base pointer of the member's storage.
    ///
    /// Element `(s, i, d0..)` lives at
    /// `data().add(s * stride(0) + i * stride(1) + Σ dk * stride(k + 2))`.
    /// Writing through this pointer is only allowed for writable policies.
    #[inline(always)]
    pub fn data(&self) -> *mut M::Value {
        self.data.as_ptr()
    }

    /// Physical rank: `field_rank() + 2` (struct and inner axes first).
    #[inline(always)]
    pub const fn rank(&self) -> usize {
        M::RANK + 2
    }

    /// Extent of physical axis `d`: `num_soa()`, `V`, then field extents.
    #[inline(always)]
    pub fn extent(&self, d: usize) -> usize {
        self.layout.extent(d)
    }

    /// Stride of physical axis `d`, in elements.
    #[inline(always)]
    pub fn stride(&self, d: usize) -> usize {
        self.layout.stride(d)
    }

    /// The full addressing geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Element ordering within struct blocks.
    pub fn orientation(&self) -> Orientation {
        self.layout.orientation()
    }

    /// Element offset of `(s, i, idx)` from [`data`](Self::data).
    #[inline(always)]
    pub fn offset(&self, s: usize, i: usize, idx: M::Index) -> usize {
        debug_assert!(
            s < self.num_soa(),
            "struct id {s} out of range ({} structs)",
            self.num_soa()
        );
        debug_assert!(
            i < self.array_size(s),
            "inner id {i} out of range for struct {s} ({} lanes)",
            self.array_size(s)
        );
        debug_assert!(
            idx.as_ref().iter().zip(M::EXTENTS).all(|(&d, e)| d < e),
            "tensor index {idx:?} out of range for extents {:?}",
            &M::EXTENTS[..M::RANK]
        );
        self.layout.offset(s, i, idx.as_ref())
    }
}

impl<'a, M: Member, const V: usize, P: ElementAccess<M::Value>> FieldSlice<'a, M, V, P> {
    /// Element `idx` of the particle at struct `s`, lane `i`.
    ///
    /// Returns an [`ElementRef`](crate::ElementRef) for the default policy,
    /// a value for random access, and an [`AtomicRef`](crate::AtomicRef)
    /// for atomic access.
    #[inline(always)]
    pub fn access(&self, s: usize, i: usize, idx: M::Index) -> P::Ref<'a> {
        let offset = self.offset(s, i, idx);
        // SAFETY: `from_raw_parts` guarantees the allocation covers every
        // in-bounds `(s, i, idx)` for `'a`; bounds are the caller's contract
        // (checked in debug builds by `offset`).
        unsafe { P::element(self.data.as_ptr().add(offset)) }
    }

    /// Element `idx` of particle `p`; same as
    /// `access(Index::<V>::s(p), Index::<V>::i(p), idx)`.
    #[inline(always)]
    pub fn at(&self, p: usize, idx: M::Index) -> P::Ref<'a> {
        debug_assert!(
            p < self.num_particle,
            "particle {p} out of range ({} particles)",
            self.num_particle
        );
        self.access(Index::<V>::s(p), Index::<V>::i(p), idx)
    }
}

impl<M: Member, const V: usize> FieldSlice<'_, M, V, DefaultAccess> {
    /// Exclusive reference to element `idx` of the particle at struct `s`,
    /// lane `i`.
    ///
    /// # Safety
    ///
    /// No other copy of this slice, and no other slice of the same storage,
    /// may access the element while the returned reference is alive.
    #[inline(always)]
    pub unsafe fn access_mut(&mut self, s: usize, i: usize, idx: M::Index) -> &mut M::Value {
        let offset = self.offset(s, i, idx);
        // SAFETY: in bounds as in `access`; exclusivity is the caller's
        // contract, and the default policy permits writes.
        unsafe { &mut *self.data.as_ptr().add(offset) }
    }

    /// Exclusive reference to element `idx` of particle `p`.
    ///
    /// # Safety
    ///
    /// As for [`access_mut`](Self::access_mut).
    #[inline(always)]
    pub unsafe fn at_mut(&mut self, p: usize, idx: M::Index) -> &mut M::Value {
        debug_assert!(
            p < self.num_particle,
            "particle {p} out of range ({} particles)",
            self.num_particle
        );
        // SAFETY: forwarded from the caller.
        unsafe { self.access_mut(Index::<V>::s(p), Index::<V>::i(p), idx) }
    }
}

impl<M: Member, const V: usize, P: AccessPolicy> ParticleStorage<V> for FieldSlice<'_, M, V, P> {
    fn num_particles(&self) -> usize {
        self.num_particle
    }
}

impl<M: Member, const V: usize, P: AccessPolicy> fmt::Debug for FieldSlice<'_, M, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlice")
            .field("member", &type_name::<M>())
            .field("policy", &P::NAME)
            .field("num_particle", &self.num_particle)
            .field("extents", &self.layout.extents())
            .field("strides", &self.layout.strides())
            .finish()
    }
}
