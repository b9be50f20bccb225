//! Iteration ranges over particle storage.

use flock_core::{Index, ParticleStorage};

use crate::error::DispatchError;

/// A half-open particle range `[begin, end)` for storage with `V` lanes per
/// struct block.
///
/// `begin` is always a multiple of `V`; `end` may fall anywhere, in which
/// case the last struct of the range is a partial one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangePolicy<const V: usize> {
    begin: usize,
    end: usize,
}

impl<const V: usize> RangePolicy<V> {
    /// An explicit range. `begin` must be struct-aligned and `<= end`.
    pub fn new(begin: usize, end: usize) -> Result<Self, DispatchError> {
        let vector_length = Index::<V>::VECTOR_LENGTH;
        if begin > end {
            return Err(DispatchError::InvertedRange { begin, end });
        }
        if begin % vector_length != 0 {
            return Err(DispatchError::UnalignedBegin {
                begin,
                vector_length,
            });
        }
        Ok(Self { begin, end })
    }

    /// The range `[0, num_particles)` of a collection or slice.
    pub fn from_storage<S: ParticleStorage<V> + ?Sized>(storage: &S) -> Self {
        Self {
            begin: 0,
            end: storage.num_particles(),
        }
    }

    /// First particle.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// One past the last particle.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of particles in the range.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the range holds no particles.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// First struct block.
    pub fn struct_begin(&self) -> usize {
        Index::<V>::s(self.begin)
    }

    /// One past the last struct block, `ceil(end / V)`.
    pub fn struct_end(&self) -> usize {
        Index::<V>::num_soa(self.end)
    }

    /// Number of struct blocks in the range.
    pub fn num_structs(&self) -> usize {
        self.struct_end() - self.struct_begin()
    }

    /// Lanes of struct `s` that fall inside the range.
    ///
    /// Valid for `struct_begin() <= s < struct_end()`.
    pub fn array_size(&self, s: usize) -> usize {
        debug_assert!(
            (self.struct_begin()..self.struct_end()).contains(&s),
            "struct {s} outside dispatch range {}..{}",
            self.struct_begin(),
            self.struct_end()
        );
        (self.end - s * V).min(V)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Particles(usize);

    impl ParticleStorage<16> for Particles {
        fn num_particles(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn storage_range_covers_all_particles() {
        let range = RangePolicy::from_storage(&Particles(155));
        assert_eq!((range.begin(), range.end()), (0, 155));
        assert_eq!(range.len(), 155);
        assert_eq!(range.struct_begin(), 0);
        assert_eq!(range.struct_end(), 10);
        assert_eq!(range.array_size(0), 16);
        assert_eq!(range.array_size(9), 11);
    }

    #[test]
    fn exact_multiple_has_full_last_struct() {
        let range = RangePolicy::<16>::new(0, 48).unwrap();
        assert_eq!(range.num_structs(), 3);
        assert_eq!(range.array_size(2), 16);
    }

    #[test]
    fn offset_range() {
        let range = RangePolicy::<8>::new(16, 29).unwrap();
        assert_eq!(range.struct_begin(), 2);
        assert_eq!(range.struct_end(), 4);
        assert_eq!(range.array_size(2), 8);
        assert_eq!(range.array_size(3), 5);
    }

    #[test]
    fn empty_ranges() {
        let range = RangePolicy::<8>::new(24, 24).unwrap();
        assert!(range.is_empty());
        assert_eq!(range.num_structs(), 0);
        assert!(RangePolicy::from_storage(&Particles(0)).is_empty());
    }

    #[test]
    fn unaligned_begin_rejected() {
        assert_eq!(
            RangePolicy::<8>::new(3, 20).unwrap_err(),
            DispatchError::UnalignedBegin {
                begin: 3,
                vector_length: 8
            }
        );
    }

    #[test]
    fn inverted_range_rejected() {
        assert_eq!(
            RangePolicy::<8>::new(16, 8).unwrap_err(),
            DispatchError::InvertedRange { begin: 16, end: 8 }
        );
    }
}
