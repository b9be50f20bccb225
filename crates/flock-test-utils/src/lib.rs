//! Shared fixtures for flock tests and benchmarks.
//!
//! The standard fixture is a five-member particle type covering every field
//! rank the engine supports, with deterministic per-element values so a test
//! can write a pass of values and verify every element afterwards.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fixture_aosoa, FixtureSlices, FixtureValues, Mat2, Tensor3, Tensor4, Vec1, DIM_1, DIM_2,
    DIM_3, DIM_4, FLAG, MAT2, TENSOR3, TENSOR4, VEC1,
};
