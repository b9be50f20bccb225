//! Field slices and AoSoA particle storage.
//!
//! This is the only crate in the workspace that contains `unsafe` code. Every
//! `unsafe` block carries a `// SAFETY:` comment naming the invariant it
//! relies on.
//!
//! # Architecture
//!
//! ```text
//! AoSoA<V> (owner)
//! ├── MemberSchema (IndexMap: name → MemberEntry { MemberInfo, byte offset })
//! └── Storage (zeroed, 8-byte aligned, num_soa * struct_bytes)
//!         │
//!         │ slice::<M, P>(member)   borrows &'a AoSoA
//!         ▼
//! FieldSlice<'a, M, V, P>
//! ├── *mut M::Value (member base)
//! ├── Layout (strides/extents, fixed at construction)
//! └── P: ElementAccess → ElementRef | value copy | AtomicRef
//! ```
//!
//! # Invalidation
//!
//! A slice borrows the collection it came from. [`AoSoA::resize`] takes
//! `&mut self`, so the borrow checker rejects any use of a slice across a
//! reallocation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aosoa;
pub mod element;
pub mod error;
pub mod schema;
pub mod slice;

pub use aosoa::{AoSoA, AoSoABuilder};
pub use element::{AtomicElement, AtomicRef, ElementAccess, ElementRef};
pub use error::{CollectionError, SliceError};
pub use schema::{MemberEntry, MemberSchema};
pub use slice::FieldSlice;
