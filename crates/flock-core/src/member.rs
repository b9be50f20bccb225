//! Particle member types: scalar elements and fixed-rank tensors of them.
//!
//! A member's type fixes its tensor rank and extents at compile time:
//!
//! ```text
//! f32                       rank 0
//! [f64; 3]                  rank 1, extents [3]
//! [[f32; 4]; 2]             rank 2, extents [2, 4]
//! [[[i32; 4]; 2]; 3]        rank 3, extents [3, 2, 4]
//! [[[[u8; 3]; 4]; 2]; 3]    rank 4, extents [3, 2, 4, 3]
//! ```
//!
//! Implementations are generated per element type and per rank, so a rank
//! above [`MAX_FIELD_RANK`] simply has no [`Member`] implementation and is
//! rejected by the type checker.

use std::any::{type_name, TypeId};
use std::fmt;
use std::mem;

use smallvec::SmallVec;

use crate::layout::MAX_FIELD_RANK;

/// A plain scalar that can be stored in a particle member.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// The compile-time shape of a particle member.
pub trait Member: Copy + Send + Sync + 'static {
    /// Scalar element type.
    type Value: Element;
    /// Tensor index, `[usize; RANK]`.
    type Index: Copy + AsRef<[usize]> + fmt::Debug + Send + Sync + 'static;
    /// Tensor rank, in `0..=MAX_FIELD_RANK`.
    const RANK: usize;
    /// Extents of the field dimensions, padded with `1` past `RANK`.
    const EXTENTS: [usize; MAX_FIELD_RANK];
    /// Number of scalar elements per particle.
    const LEN: usize = Self::EXTENTS[0] * Self::EXTENTS[1] * Self::EXTENTS[2] * Self::EXTENTS[3];
}

macro_rules! impl_member {
    ($($t:ty),* $(,)?) => {$(
        impl Element for $t {}

        impl Member for $t {
            type Value = $t;
            type Index = [usize; 0];
            const RANK: usize = 0;
            const EXTENTS: [usize; MAX_FIELD_RANK] = [1, 1, 1, 1];
        }

        impl<const D0: usize> Member for [$t; D0] {
            type Value = $t;
            type Index = [usize; 1];
            const RANK: usize = 1;
            const EXTENTS: [usize; MAX_FIELD_RANK] = [D0, 1, 1, 1];
        }

        impl<const D0: usize, const D1: usize> Member for [[$t; D1]; D0] {
            type Value = $t;
            type Index = [usize; 2];
            const RANK: usize = 2;
            const EXTENTS: [usize; MAX_FIELD_RANK] = [D0, D1, 1, 1];
        }

        impl<const D0: usize, const D1: usize, const D2: usize> Member for [[[$t; D2]; D1]; D0] {
            type Value = $t;
            type Index = [usize; 3];
            const RANK: usize = 3;
            const EXTENTS: [usize; MAX_FIELD_RANK] = [D0, D1, D2, 1];
        }

        impl<const D0: usize, const D1: usize, const D2: usize, const D3: usize> Member
            for [[[[$t; D3]; D2]; D1]; D0]
        {
            type Value = $t;
            type Index = [usize; 4];
            const RANK: usize = 4;
            const EXTENTS: [usize; MAX_FIELD_RANK] = [D0, D1, D2, D3];
        }
    )*};
}

impl_member!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Runtime description of a [`Member`] type.
///
/// Captured when a member is registered with a collection so later slice
/// requests can be checked against the declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    type_id: TypeId,
    type_name: &'static str,
    extents: SmallVec<[usize; MAX_FIELD_RANK]>,
    len: usize,
    value_size: usize,
    value_align: usize,
}

impl MemberInfo {
    /// Describe member type `M`.
    pub fn of<M: Member>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
            extents: M::EXTENTS[..M::RANK].iter().copied().collect(),
            len: M::LEN,
            value_size: mem::size_of::<M::Value>(),
            value_align: mem::align_of::<M::Value>(),
        }
    }

    /// Whether this describes exactly the type `M`.
    pub fn is<M: Member>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    /// The member's Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Tensor rank.
    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    /// Field dimension extents, one per rank.
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Scalar elements per particle.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the member holds no elements (a zero extent).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of one scalar element in bytes.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Alignment of one scalar element in bytes.
    pub fn value_align(&self) -> usize {
        self.value_align
    }

    /// Bytes occupied by one particle's worth of this member.
    pub fn particle_bytes(&self) -> usize {
        self.len * self.value_size
    }
}

impl fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (rank {}, extents {:?})", self.type_name, self.rank(), self.extents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_member() {
        assert_eq!(<f64 as Member>::RANK, 0);
        assert_eq!(<f64 as Member>::LEN, 1);
        let info = MemberInfo::of::<i32>();
        assert_eq!(info.rank(), 0);
        assert!(info.extents().is_empty());
        assert_eq!(info.particle_bytes(), 4);
    }

    #[test]
    fn tensor_members_report_c_order_extents() {
        type T3 = [[[f32; 4]; 2]; 3];
        assert_eq!(<T3 as Member>::RANK, 3);
        assert_eq!(<T3 as Member>::EXTENTS, [3, 2, 4, 1]);
        assert_eq!(<T3 as Member>::LEN, 24);

        type T4 = [[[[f32; 3]; 4]; 2]; 3];
        let info = MemberInfo::of::<T4>();
        assert_eq!(info.extents(), &[3, 2, 4, 3]);
        assert_eq!(info.len(), 72);
        assert_eq!(info.particle_bytes(), mem::size_of::<T4>());
    }

    #[test]
    fn member_info_identifies_its_type() {
        let info = MemberInfo::of::<[f64; 3]>();
        assert!(info.is::<[f64; 3]>());
        assert!(!info.is::<[f32; 3]>());
        assert!(!info.is::<[f64; 4]>());
        assert_eq!(info.value_size(), 8);
    }

    #[test]
    fn zero_extent_member_is_empty() {
        let info = MemberInfo::of::<[u8; 0]>();
        assert!(info.is_empty());
        assert_eq!(info.particle_bytes(), 0);
    }
}
