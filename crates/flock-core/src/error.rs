//! Layout construction errors.

use std::error::Error;
use std::fmt;

/// Errors detected while computing a [`Layout`](crate::Layout).
///
/// All of these are configuration errors: they are reported before any
/// slice exists, and no partially built layout is ever returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// More field dimensions than the engine supports.
    RankTooLarge {
        /// The requested field rank.
        rank: usize,
        /// The largest supported field rank.
        max: usize,
    },
    /// The vector length is zero.
    ZeroVectorLength,
    /// The per-struct stride cannot hold one struct block of this field.
    StructStrideTooSmall {
        /// The configured stride in elements.
        stride: usize,
        /// Elements needed by one struct block.
        required: usize,
    },
    /// The addressed element count does not fit in `usize`.
    Overflow,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankTooLarge { rank, max } => {
                write!(f, "field rank {rank} exceeds the supported maximum of {max}")
            }
            Self::ZeroVectorLength => write!(f, "vector length must be positive"),
            Self::StructStrideTooSmall { stride, required } => {
                write!(
                    f,
                    "struct stride {stride} is smaller than one struct block ({required} elements)"
                )
            }
            Self::Overflow => write!(f, "layout size overflows usize"),
        }
    }
}

impl Error for LayoutError {}
