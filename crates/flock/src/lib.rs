//! Flock: an AoSoA particle field layout and access engine.
//!
//! Particles are stored as an array of struct blocks; each block holds `V`
//! particles with every member laid out as a small structure of arrays. A
//! [`FieldSlice`](slice::FieldSlice) views one member, addressing elements by
//! particle id or by (struct, lane) pair, and [`parallel::parallel_for`]
//! runs kernels over particle ranges.
//!
//! This is the facade crate that re-exports the public API of the flock
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use flock::prelude::*;
//!
//! type Velocity = [f64; 3];
//!
//! let particles = AoSoA::<16>::builder()
//!     .member::<Velocity>("velocity")
//!     .member::<f64>("speed")
//!     .build(100)
//!     .unwrap();
//! let velocity = particles.slice::<Velocity>(0).unwrap();
//! let speed = particles.slice::<f64>(1).unwrap();
//! let range = RangePolicy::from_storage(&particles);
//!
//! parallel_for_default(&range, |p| {
//!     for d in 0..3 {
//!         velocity.at(p, [d]).set((p + d) as f64);
//!     }
//! });
//! parallel_for(
//!     &range,
//!     |s: usize, i: usize| {
//!         let v: f64 = (0..3).map(|d| velocity.access(s, i, [d]).get().powi(2)).sum();
//!         speed.access(s, i, []).set(v.sqrt());
//!     },
//!     StructAndArrayParallel,
//! );
//! assert_eq!(speed.at(0, []).get(), 5f64.sqrt());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `flock-core` | Index mapping, member types, access policies, layouts |
//! | [`slice`] | `flock-slice` | Field slices, element proxies, the `AoSoA` owner |
//! | [`parallel`] | `flock-parallel` | Range policies, dispatch tags, `parallel_for` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Index mapping, member types, access policies and layouts (`flock-core`).
pub use flock_core as types;

/// Field slices, element proxies and particle storage (`flock-slice`).
pub use flock_slice as slice;

/// Range policies and tagged dispatch (`flock-parallel`).
pub use flock_parallel as parallel;

/// Common imports for typical flock usage.
///
/// ```rust
/// use flock::prelude::*;
/// ```
pub mod prelude {
    // Indexing and layout
    pub use flock_core::{Index, Member, Orientation, ParticleStorage};

    // Access policies
    pub use flock_core::{AccessPolicy, AtomicAccess, DefaultAccess, RandomAccess};

    // Storage and slices
    pub use flock_slice::{AoSoA, AtomicRef, ElementRef, FieldSlice};

    // Dispatch
    pub use flock_parallel::{
        parallel_for, parallel_for_default, ArrayParallel, RangePolicy, StructAndArrayParallel,
        StructParallel,
    };

    // Errors
    pub use flock_core::LayoutError;
    pub use flock_parallel::DispatchError;
    pub use flock_slice::{CollectionError, SliceError};
}
