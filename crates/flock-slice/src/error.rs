//! Slice and collection error types.

use std::error::Error;
use std::fmt;

use flock_core::LayoutError;

/// Errors from constructing a [`FieldSlice`](crate::FieldSlice).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// The base pointer is null while the slice addresses particles.
    NullPointer {
        /// The requested particle count.
        num_particle: usize,
    },
    /// The struct count disagrees with `ceil(num_particle / V)`.
    SoaCountMismatch {
        /// Struct count implied by the particle count.
        expected: usize,
        /// Struct count supplied by the owner.
        actual: usize,
    },
    /// The member's layout could not be computed.
    Layout(LayoutError),
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullPointer { num_particle } => {
                write!(f, "null base pointer for a slice of {num_particle} particles")
            }
            Self::SoaCountMismatch { expected, actual } => {
                write!(f, "struct count {actual} does not match the particle count (expected {expected})")
            }
            Self::Layout(e) => write!(f, "invalid layout: {e}"),
        }
    }
}

impl Error for SliceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutError> for SliceError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

/// Errors from building or slicing an [`AoSoA`](crate::AoSoA).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionError {
    /// No members were registered.
    NoMembers,
    /// Two members share a name.
    DuplicateMember {
        /// The repeated name.
        name: String,
    },
    /// No member with this index or name exists.
    UnknownMember {
        /// The index or name that was looked up.
        member: String,
    },
    /// The requested slice type differs from the member's declared type.
    MemberTypeMismatch {
        /// The member's name.
        member: String,
        /// The type the member was registered with.
        declared: &'static str,
        /// The type the caller asked for.
        requested: &'static str,
    },
    /// The storage size does not fit in `usize`.
    CapacityOverflow {
        /// The requested particle count.
        num_particles: usize,
    },
    /// Building the slice failed.
    Slice(SliceError),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMembers => write!(f, "a particle collection needs at least one member"),
            Self::DuplicateMember { name } => write!(f, "duplicate member name '{name}'"),
            Self::UnknownMember { member } => write!(f, "unknown member '{member}'"),
            Self::MemberTypeMismatch {
                member,
                declared,
                requested,
            } => {
                write!(
                    f,
                    "member '{member}' is declared as {declared}, requested as {requested}"
                )
            }
            Self::CapacityOverflow { num_particles } => {
                write!(f, "storage for {num_particles} particles overflows usize")
            }
            Self::Slice(e) => write!(f, "slice construction failed: {e}"),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SliceError> for CollectionError {
    fn from(e: SliceError) -> Self {
        Self::Slice(e)
    }
}
