//! Range policies and tagged parallel dispatch for flock.
//!
//! A [`RangePolicy`] names a half-open particle range `[begin, end)` whose
//! `begin` sits on a struct boundary. [`parallel_for`] runs a kernel over
//! that range with one of three decompositions, chosen by a tag type:
//!
//! | Tag | Kernel signature | One invocation per |
//! |-----|------------------|--------------------|
//! | [`ArrayParallel`] | `op(p)` | particle |
//! | [`StructParallel`] | `op(s)` | struct block |
//! | [`StructAndArrayParallel`] | `op(s, i)` | valid (struct, lane) pair |
//!
//! Invocations are unordered and may run concurrently. With the `parallel`
//! feature (on by default) they run on the rayon global pool; without it
//! they run serially on the calling thread with identical coverage.
//! Dispatch returns only after every invocation has completed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod policy;
pub mod tag;

pub use dispatch::{parallel_for, parallel_for_default};
pub use error::DispatchError;
pub use policy::RangePolicy;
pub use tag::{ArrayParallel, DispatchTag, StructAndArrayParallel, StructParallel};
