//! Memory access policies for field slices.
//!
//! A policy is a zero-sized marker type chosen when a slice is created. The
//! slice carries it as a type parameter, so the element-access primitive is
//! resolved at compile time and never branches on a runtime flag.
//!
//! | Policy | Reads | Writes | Concurrent writes to one element |
//! |--------|-------|--------|----------------------------------|
//! | [`DefaultAccess`] | yes | yes | caller must prevent |
//! | [`RandomAccess`] | by value | no | n/a |
//! | [`AtomicAccess`] | yes | yes | indivisible |

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A statically selected element-access policy.
///
/// Sealed: the three markers in this module are the only policies.
pub trait AccessPolicy:
    sealed::Sealed + Copy + Default + fmt::Debug + Send + Sync + 'static
{
    /// Short name used in diagnostics.
    const NAME: &'static str;
    /// Whether elements may be written through a slice with this policy.
    const WRITABLE: bool;
    /// Whether every access is atomic.
    const ATOMIC: bool;
}

/// Unsynchronized read/write access.
///
/// The caller guarantees that no two concurrent invocations write the same
/// element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultAccess;

/// Read-only access returning element copies.
///
/// Intended for gather-style reads in non-sequential order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RandomAccess;

/// Atomic access: every read-modify-write is indivisible with respect to
/// other atomic accesses of the same element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtomicAccess;

impl sealed::Sealed for DefaultAccess {}
impl sealed::Sealed for RandomAccess {}
impl sealed::Sealed for AtomicAccess {}

impl AccessPolicy for DefaultAccess {
    const NAME: &'static str = "default";
    const WRITABLE: bool = true;
    const ATOMIC: bool = false;
}

impl AccessPolicy for RandomAccess {
    const NAME: &'static str = "random_access";
    const WRITABLE: bool = false;
    const ATOMIC: bool = false;
}

impl AccessPolicy for AtomicAccess {
    const NAME: &'static str = "atomic";
    const WRITABLE: bool = true;
    const ATOMIC: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits_of<P: AccessPolicy>() -> (&'static str, bool, bool) {
        (P::NAME, P::WRITABLE, P::ATOMIC)
    }

    #[test]
    fn policy_constants() {
        assert_eq!(traits_of::<DefaultAccess>(), ("default", true, false));
        assert_eq!(traits_of::<RandomAccess>(), ("random_access", false, false));
        assert_eq!(traits_of::<AtomicAccess>(), ("atomic", true, true));
    }

    #[test]
    fn policies_are_zero_sized() {
        assert_eq!(std::mem::size_of::<DefaultAccess>(), 0);
        assert_eq!(std::mem::size_of::<RandomAccess>(), 0);
        assert_eq!(std::mem::size_of::<AtomicAccess>(), 0);
    }
}
