//! Dispatch range errors.

use std::error::Error;
use std::fmt;

/// Errors from constructing a [`RangePolicy`](crate::RangePolicy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// `begin` does not fall on a struct boundary.
    UnalignedBegin {
        /// The requested first particle.
        begin: usize,
        /// Lanes per struct block.
        vector_length: usize,
    },
    /// `begin` lies after `end`.
    InvertedRange {
        /// The requested first particle.
        begin: usize,
        /// The requested end (exclusive).
        end: usize,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnalignedBegin {
                begin,
                vector_length,
            } => {
                write!(
                    f,
                    "range begin {begin} is not a multiple of the vector length {vector_length}"
                )
            }
            Self::InvertedRange { begin, end } => {
                write!(f, "range begin {begin} is past its end {end}")
            }
        }
    }
}

impl Error for DispatchError {}
