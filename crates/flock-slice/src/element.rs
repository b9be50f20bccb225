//! Per-policy element access primitives.
//!
//! Each [`AccessPolicy`] supplies what `FieldSlice::access` hands back:
//!
//! - [`DefaultAccess`] → [`ElementRef`], a read/write proxy with plain loads
//!   and stores.
//! - [`RandomAccess`] → the element value itself.
//! - [`AtomicAccess`] → [`AtomicRef`], whose read-modify-write operations
//!   are indivisible. Only element types implementing [`AtomicElement`] can
//!   be accessed atomically.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::atomic::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicU16, AtomicU32, AtomicU64,
    AtomicU8, AtomicUsize, Ordering,
};

use flock_core::{AccessPolicy, AtomicAccess, DefaultAccess, Element, RandomAccess};

/// Maps an access policy to the handle it produces for an element of type
/// `T`.
pub trait ElementAccess<T: Element>: AccessPolicy {
    /// What element access returns under this policy.
    type Ref<'a>;

    /// Produce the access handle for the element at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and point to an initialised `T`
    /// inside storage that stays allocated and unmoved for `'a`. If the
    /// policy is writable, the storage must permit writes through `ptr`.
    unsafe fn element<'a>(ptr: *mut T) -> Self::Ref<'a>;
}

impl<T: Element> ElementAccess<T> for DefaultAccess {
    type Ref<'a> = ElementRef<'a, T>;

    #[inline(always)]
    unsafe fn element<'a>(ptr: *mut T) -> Self::Ref<'a> {
        // SAFETY: caller guarantees `ptr` is non-null.
        ElementRef {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            _marker: PhantomData,
        }
    }
}

impl<T: Element> ElementAccess<T> for RandomAccess {
    type Ref<'a> = T;

    #[inline(always)]
    unsafe fn element<'a>(ptr: *mut T) -> Self::Ref<'a> {
        // SAFETY: caller guarantees `ptr` points to an initialised, aligned `T`.
        unsafe { ptr.read() }
    }
}

impl<T: AtomicElement> ElementAccess<T> for AtomicAccess {
    type Ref<'a> = AtomicRef<'a, T>;

    #[inline(always)]
    unsafe fn element<'a>(ptr: *mut T) -> Self::Ref<'a> {
        AtomicRef {
            // SAFETY: forwarded from the caller; see `AtomicElement::as_atomic`.
            atomic: unsafe { T::as_atomic(ptr) },
        }
    }
}

/// Read/write handle to one element of a [`DefaultAccess`] slice.
///
/// Loads and stores are plain, unsynchronized memory operations. Two
/// concurrent invocations must never write the same element; writes to
/// distinct elements (or distinct members) never conflict.
pub struct ElementRef<'a, T> {
    ptr: NonNull<T>,
    _marker: PhantomData<&'a T>,
}

impl<T: Element> ElementRef<'_, T> {
    /// Read the element.
    #[inline(always)]
    pub fn get(&self) -> T {
        // SAFETY: constructed by `ElementAccess::element`, whose contract
        // keeps `ptr` valid and aligned for the handle's lifetime.
        unsafe { self.ptr.as_ptr().read() }
    }

    /// Overwrite the element.
    #[inline(always)]
    pub fn set(&self, value: T) {
        // SAFETY: as in `get`; the default policy permits writes.
        unsafe { self.ptr.as_ptr().write(value) }
    }

    /// Overwrite the element, returning the previous value.
    #[inline(always)]
    pub fn replace(&self, value: T) -> T {
        let previous = self.get();
        self.set(value);
        previous
    }

    /// Apply `f` to the element in place, returning the new value.
    ///
    /// Not atomic: use an [`AtomicAccess`] slice when several invocations
    /// update the same element.
    #[inline(always)]
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        let value = f(self.get());
        self.set(value);
        value
    }

    /// Raw pointer to the element.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Clone for ElementRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ElementRef<'_, T> {}

impl<T: Element> fmt::Debug for ElementRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.get()).finish()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// An element type with a lock-free atomic representation.
///
/// Integer elements map to the matching `std::sync::atomic` type. `f32` and
/// `f64` are stored as their bit patterns in `AtomicU32`/`AtomicU64`;
/// compare-exchange on floats therefore compares bits, not values.
pub trait AtomicElement: Element + sealed::Sealed {
    /// The atomic type sharing this element's size and bit layout.
    type Atomic: Send + Sync + 'static;

    /// View the element at `ptr` as its atomic type.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned to `align_of::<Self::Atomic>()`, valid
    /// for reads and writes for `'a`, and not accessed non-atomically while
    /// the returned reference is in use.
    unsafe fn as_atomic<'a>(ptr: *mut Self) -> &'a Self::Atomic;

    /// Atomic load.
    fn load(atomic: &Self::Atomic, order: Ordering) -> Self;

    /// Atomic store.
    fn store(atomic: &Self::Atomic, value: Self, order: Ordering);

    /// Atomic swap, returning the previous value.
    fn swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;

    /// Weak compare-exchange; may fail spuriously.
    fn compare_exchange_weak(
        atomic: &Self::Atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    /// Atomic addition, returning the previous value. Integers wrap.
    fn fetch_add(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
}

macro_rules! impl_atomic_int {
    ($($t:ty => $atomic:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl AtomicElement for $t {
            type Atomic = $atomic;

            #[inline(always)]
            unsafe fn as_atomic<'a>(ptr: *mut Self) -> &'a $atomic {
                debug_assert!(ptr.cast::<$atomic>().is_aligned());
                // SAFETY: forwarded from the caller's contract.
                unsafe { <$atomic>::from_ptr(ptr) }
            }

            #[inline(always)]
            fn load(atomic: &$atomic, order: Ordering) -> Self {
                atomic.load(order)
            }

            #[inline(always)]
            fn store(atomic: &$atomic, value: Self, order: Ordering) {
                atomic.store(value, order)
            }

            #[inline(always)]
            fn swap(atomic: &$atomic, value: Self, order: Ordering) -> Self {
                atomic.swap(value, order)
            }

            #[inline(always)]
            fn compare_exchange_weak(
                atomic: &$atomic,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                atomic.compare_exchange_weak(current, new, success, failure)
            }

            #[inline(always)]
            fn fetch_add(atomic: &$atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_add(value, order)
            }
        }
    )*};
}

macro_rules! impl_atomic_float {
    ($($t:ty => $atomic:ty, $bits:ty),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl AtomicElement for $t {
            type Atomic = $atomic;

            #[inline(always)]
            unsafe fn as_atomic<'a>(ptr: *mut Self) -> &'a $atomic {
                debug_assert!(ptr.cast::<$atomic>().is_aligned());
                // SAFETY: the float and its bit pattern share size; alignment
                // and validity are forwarded from the caller's contract.
                unsafe { <$atomic>::from_ptr(ptr.cast::<$bits>()) }
            }

            #[inline(always)]
            fn load(atomic: &$atomic, order: Ordering) -> Self {
                <$t>::from_bits(atomic.load(order))
            }

            #[inline(always)]
            fn store(atomic: &$atomic, value: Self, order: Ordering) {
                atomic.store(value.to_bits(), order)
            }

            #[inline(always)]
            fn swap(atomic: &$atomic, value: Self, order: Ordering) -> Self {
                <$t>::from_bits(atomic.swap(value.to_bits(), order))
            }

            #[inline(always)]
            fn compare_exchange_weak(
                atomic: &$atomic,
                current: Self,
                new: Self,
                success: Ordering,
                failure: Ordering,
            ) -> Result<Self, Self> {
                atomic
                    .compare_exchange_weak(current.to_bits(), new.to_bits(), success, failure)
                    .map(<$t>::from_bits)
                    .map_err(<$t>::from_bits)
            }

            #[inline(always)]
            fn fetch_add(atomic: &$atomic, value: Self, order: Ordering) -> Self {
                let mut current = atomic.load(Ordering::Relaxed);
                loop {
                    let new = (<$t>::from_bits(current) + value).to_bits();
                    match atomic.compare_exchange_weak(current, new, order, Ordering::Relaxed) {
                        Ok(previous) => return <$t>::from_bits(previous),
                        Err(actual) => current = actual,
                    }
                }
            }
        }
    )*};
}

impl_atomic_int!(
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    i64 => AtomicI64,
    u64 => AtomicU64,
    isize => AtomicIsize,
    usize => AtomicUsize,
);

impl_atomic_float!(
    f32 => AtomicU32, u32,
    f64 => AtomicU64, u64,
);

/// Handle to one element of an [`AtomicAccess`] slice.
///
/// All operations use relaxed ordering: they are indivisible per element but
/// do not order other memory. Completion of a dispatch publishes every
/// update to the caller.
pub struct AtomicRef<'a, T: AtomicElement> {
    atomic: &'a T::Atomic,
}

impl<T: AtomicElement> AtomicRef<'_, T> {
    /// Atomically read the element.
    #[inline(always)]
    pub fn load(&self) -> T {
        T::load(self.atomic, Ordering::Relaxed)
    }

    /// Atomically overwrite the element.
    #[inline(always)]
    pub fn store(&self, value: T) {
        T::store(self.atomic, value, Ordering::Relaxed)
    }

    /// Atomically replace the element, returning the previous value.
    #[inline(always)]
    pub fn swap(&self, value: T) -> T {
        T::swap(self.atomic, value, Ordering::Relaxed)
    }

    /// Atomically add `value`, returning the previous value.
    #[inline(always)]
    pub fn fetch_add(&self, value: T) -> T {
        T::fetch_add(self.atomic, value, Ordering::Relaxed)
    }

    /// Atomically replace the element with `f(current)`, retrying on
    /// contention. Returns the previous value.
    pub fn fetch_update(&self, mut f: impl FnMut(T) -> T) -> T {
        let mut current = self.load();
        loop {
            match T::compare_exchange_weak(
                self.atomic,
                current,
                f(current),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(previous) => return previous,
                Err(actual) => current = actual,
            }
        }
    }
}

impl<T: AtomicElement> fmt::Debug for AtomicRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicRef").field(&self.load()).finish()
    }
}
