//! Stride computation for AoSoA member storage.
//!
//! A member of rank `r` is addressed as a `(2 + r)`-dimensional strided
//! array over the axes `[struct, inner, dim0, .., dim(r-1)]`:
//!
//! ```text
//! offset(s, i, d0..) = s * stride[0] + i * stride[1] + Σ dk * stride[k + 2]
//! ```
//!
//! Row-major packs each particle's tensor contiguously (last dim fastest)
//! and places particles one after another within a struct block.
//! Column-major makes the inner (lane) axis fastest, so lane `i` of every
//! tensor component sits next to lane `i + 1`, which is what vector units
//! want. The struct stride is supplied by the owner and may exceed one
//! struct block of this member, since several members share a block.

use crate::error::LayoutError;
use crate::member::Member;

/// Largest supported field (tensor) rank.
pub const MAX_FIELD_RANK: usize = 4;

/// Largest physical rank: struct and inner axes plus the field dims.
pub const MAX_RANK: usize = MAX_FIELD_RANK + 2;

/// Element ordering of a member within a struct block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Last field dimension fastest; one particle's tensor is contiguous.
    #[default]
    RowMajor,
    /// Inner (lane) axis fastest, then dim0, dim1, ...
    ColumnMajor,
}

/// Addressing geometry of one member: extents and strides of every
/// physical axis.
///
/// Computed once when a slice is created and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    orientation: Orientation,
    rank: usize,
    extents: [usize; MAX_RANK],
    strides: [usize; MAX_RANK],
}

impl Layout {
    /// Compute the layout of a member with the given field extents.
    ///
    /// `struct_stride` is the distance, in elements of the member's scalar
    /// type, between the starts of consecutive struct blocks.
    pub fn new(
        field_extents: &[usize],
        orientation: Orientation,
        vector_length: usize,
        struct_stride: usize,
        num_soa: usize,
    ) -> Result<Self, LayoutError> {
        let field_rank = field_extents.len();
        if field_rank > MAX_FIELD_RANK {
            return Err(LayoutError::RankTooLarge {
                rank: field_rank,
                max: MAX_FIELD_RANK,
            });
        }
        if vector_length == 0 {
            return Err(LayoutError::ZeroVectorLength);
        }

        let per_particle = field_extents
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(LayoutError::Overflow)?;
        let per_struct = per_particle
            .checked_mul(vector_length)
            .ok_or(LayoutError::Overflow)?;
        if struct_stride < per_struct {
            return Err(LayoutError::StructStrideTooSmall {
                stride: struct_stride,
                required: per_struct,
            });
        }
        num_soa
            .checked_mul(struct_stride)
            .ok_or(LayoutError::Overflow)?;

        let rank = field_rank + 2;
        let mut extents = [0; MAX_RANK];
        let mut strides = [0; MAX_RANK];
        extents[0] = num_soa;
        extents[1] = vector_length;
        extents[2..rank].copy_from_slice(field_extents);
        strides[0] = struct_stride;

        match orientation {
            Orientation::RowMajor => {
                let mut acc = 1;
                for k in (0..field_rank).rev() {
                    strides[k + 2] = acc;
                    acc *= field_extents[k];
                }
                strides[1] = acc;
            }
            Orientation::ColumnMajor => {
                strides[1] = 1;
                let mut acc = vector_length;
                for k in 0..field_rank {
                    strides[k + 2] = acc;
                    acc *= field_extents[k];
                }
            }
        }

        Ok(Self {
            orientation,
            rank,
            extents,
            strides,
        })
    }

    /// Compute the layout of member type `M`.
    pub fn for_member<M: Member>(
        orientation: Orientation,
        vector_length: usize,
        struct_stride: usize,
        num_soa: usize,
    ) -> Result<Self, LayoutError> {
        Self::new(
            &M::EXTENTS[..M::RANK],
            orientation,
            vector_length,
            struct_stride,
            num_soa,
        )
    }

    /// Element ordering.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Physical rank: field rank + 2.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Field (tensor) rank.
    pub fn field_rank(&self) -> usize {
        self.rank - 2
    }

    /// Number of struct blocks (extent of axis 0).
    pub fn num_soa(&self) -> usize {
        self.extents[0]
    }

    /// Lanes per struct block (extent of axis 1).
    pub fn vector_length(&self) -> usize {
        self.extents[1]
    }

    /// Extent of physical axis `d`.
    #[inline(always)]
    pub fn extent(&self, d: usize) -> usize {
        debug_assert!(d < self.rank, "axis {d} out of range for rank {}", self.rank);
        self.extents[d]
    }

    /// Stride of physical axis `d`, in elements.
    #[inline(always)]
    pub fn stride(&self, d: usize) -> usize {
        debug_assert!(d < self.rank, "axis {d} out of range for rank {}", self.rank);
        self.strides[d]
    }

    /// Extents of all physical axes.
    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.rank]
    }

    /// Strides of all physical axes.
    pub fn strides(&self) -> &[usize] {
        &self.strides[..self.rank]
    }

    /// Elements spanned by all struct blocks: `num_soa * struct_stride`.
    pub fn span(&self) -> usize {
        self.extents[0] * self.strides[0]
    }

    /// Element offset of `(s, i, idx..)` relative to the member's base.
    #[inline(always)]
    pub fn offset(&self, s: usize, i: usize, idx: &[usize]) -> usize {
        debug_assert_eq!(idx.len(), self.rank - 2, "tensor index has the wrong rank");
        let mut offset = s * self.strides[0] + i * self.strides[1];
        for (k, &d) in idx.iter().enumerate() {
            offset += d * self.strides[k + 2];
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn row_major_rank_three() {
        // 3 structs of 16 lanes, member [3][2][4], tightly packed.
        let layout = Layout::new(&[3, 2, 4], Orientation::RowMajor, 16, 16 * 24, 3).unwrap();
        assert_eq!(layout.rank(), 5);
        assert_eq!(layout.extents(), &[3, 16, 3, 2, 4]);
        assert_eq!(layout.strides(), &[384, 24, 8, 4, 1]);
    }

    #[test]
    fn column_major_rank_three() {
        let layout = Layout::new(&[3, 2, 4], Orientation::ColumnMajor, 16, 16 * 24, 3).unwrap();
        assert_eq!(layout.strides(), &[384, 1, 16, 48, 96]);
    }

    #[test]
    fn column_major_rank_four() {
        let layout = Layout::new(&[3, 2, 4, 3], Orientation::ColumnMajor, 8, 1000, 2).unwrap();
        assert_eq!(layout.strides(), &[1000, 1, 8, 24, 48, 192]);
    }

    #[test]
    fn scalar_layouts_agree_across_orientations() {
        let row = Layout::new(&[], Orientation::RowMajor, 16, 64, 4).unwrap();
        let col = Layout::new(&[], Orientation::ColumnMajor, 16, 64, 4).unwrap();
        assert_eq!(row.strides(), &[64, 1]);
        assert_eq!(col.strides(), &[64, 1]);
        assert_eq!(row.field_rank(), 0);
    }

    #[test]
    fn member_layout_matches_explicit_extents() {
        let a = Layout::for_member::<[[f64; 2]; 3]>(Orientation::RowMajor, 4, 24, 5).unwrap();
        let b = Layout::new(&[3, 2], Orientation::RowMajor, 4, 24, 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.span(), 120);
    }

    #[test]
    fn rank_above_four_rejected() {
        let err = Layout::new(&[1, 1, 1, 1, 1], Orientation::RowMajor, 4, 4, 1).unwrap_err();
        assert_eq!(err, LayoutError::RankTooLarge { rank: 5, max: 4 });
    }

    #[test]
    fn zero_vector_length_rejected() {
        let err = Layout::new(&[2], Orientation::RowMajor, 0, 8, 1).unwrap_err();
        assert_eq!(err, LayoutError::ZeroVectorLength);
    }

    #[test]
    fn undersized_struct_stride_rejected() {
        let err = Layout::new(&[3], Orientation::ColumnMajor, 16, 47, 2).unwrap_err();
        assert_eq!(
            err,
            LayoutError::StructStrideTooSmall {
                stride: 47,
                required: 48
            }
        );
    }

    #[test]
    fn overflowing_extents_rejected() {
        let err = Layout::new(&[usize::MAX, 2], Orientation::RowMajor, 1, usize::MAX, 1);
        assert_eq!(err.unwrap_err(), LayoutError::Overflow);
    }

    #[test]
    fn empty_collection_layout_is_valid() {
        let layout = Layout::new(&[3], Orientation::RowMajor, 16, 48, 0).unwrap();
        assert_eq!(layout.num_soa(), 0);
        assert_eq!(layout.span(), 0);
    }

    fn arb_geometry() -> impl Strategy<Value = (Vec<usize>, usize, usize, usize)> {
        (
            prop::collection::vec(1usize..5, 0..=MAX_FIELD_RANK),
            1usize..9,
            0usize..7,
            1usize..4,
        )
    }

    fn for_each_tuple(layout: &Layout, mut f: impl FnMut(usize, usize, &[usize])) {
        let field_extents = &layout.extents()[2..];
        let per_particle: usize = field_extents.iter().product();
        let mut idx = vec![0; field_extents.len()];
        for s in 0..layout.num_soa() {
            for i in 0..layout.vector_length() {
                for mut flat in 0..per_particle {
                    for d in (0..field_extents.len()).rev() {
                        idx[d] = flat % field_extents[d];
                        flat /= field_extents[d];
                    }
                    f(s, i, &idx);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn offsets_are_a_bijection_onto_the_struct_blocks(
            (dims, v, num_soa, padding) in arb_geometry(),
            column_major in any::<bool>(),
        ) {
            let orientation = if column_major {
                Orientation::ColumnMajor
            } else {
                Orientation::RowMajor
            };
            let per_struct: usize = v * dims.iter().product::<usize>();
            let struct_stride = per_struct * padding;
            let layout = Layout::new(&dims, orientation, v, struct_stride, num_soa).unwrap();

            let mut seen = vec![false; layout.span()];
            let mut count = 0;
            for_each_tuple(&layout, |s, i, idx| {
                let offset = layout.offset(s, i, idx);
                // Every tuple of a struct block stays inside that block.
                assert!(offset >= s * struct_stride);
                assert!(offset < s * struct_stride + per_struct);
                assert!(!seen[offset], "offset {offset} addressed twice");
                seen[offset] = true;
                count += 1;
            });
            prop_assert_eq!(count, num_soa * per_struct);
        }

        #[test]
        fn unit_stride_axis_matches_orientation(
            (dims, v, num_soa, _padding) in arb_geometry(),
        ) {
            prop_assume!(!dims.is_empty());
            let stride = v * dims.iter().product::<usize>();
            let row = Layout::new(&dims, Orientation::RowMajor, v, stride, num_soa).unwrap();
            let col = Layout::new(&dims, Orientation::ColumnMajor, v, stride, num_soa).unwrap();
            prop_assert_eq!(row.stride(row.rank() - 1), 1);
            prop_assert_eq!(row.stride(1), dims.iter().product::<usize>());
            prop_assert_eq!(col.stride(1), 1);
            prop_assert_eq!(col.stride(2), v);
        }
    }
}
