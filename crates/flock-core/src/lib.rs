//! Core types and traits for the flock AoSoA particle layout engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pure addressing math shared by the rest of the workspace:
//!
//! - [`Index`]: particle id ↔ `(struct, inner)` decomposition for a
//!   compile-time vector length.
//! - [`Member`]: compile-time tensor shape of a particle field (rank 0–4).
//! - [`Layout`]: the stride vector over `[struct, inner, dim0..]`.
//! - [`access`]: the three statically selected access policies.
//! - [`ParticleStorage`]: anything with a particle count and a vector length.
//!
//! Nothing here touches memory; raw pointers live in `flock-slice`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod access;
pub mod error;
pub mod index;
pub mod layout;
pub mod member;
pub mod traits;

pub use access::{AccessPolicy, AtomicAccess, DefaultAccess, RandomAccess};
pub use error::LayoutError;
pub use index::Index;
pub use layout::{Layout, Orientation, MAX_FIELD_RANK, MAX_RANK};
pub use member::{Element, Member, MemberInfo};
pub use traits::ParticleStorage;
