//! The owning AoSoA particle collection.
//!
//! An [`AoSoA`] allocates `num_soa` struct blocks of [`MemberSchema::struct_bytes`]
//! bytes each and hands out [`FieldSlice`] views of its members. Storage is
//! zero-initialised, 8-byte aligned, and interior-mutable: slices borrow the
//! collection shared (`&self`) yet may write through writable policies.

use std::any::type_name;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::ptr;
use std::slice;

use flock_core::{
    AccessPolicy, DefaultAccess, Index, Member, MemberInfo, Orientation, ParticleStorage,
};

use crate::error::CollectionError;
use crate::schema::{MemberEntry, MemberSchema};
use crate::slice::FieldSlice;

/// One storage word. Aligned to 8 on every target, including those where
/// `u64` itself is only 4-aligned, so 64-bit atomics fit at member bases.
#[repr(C, align(8))]
struct Word(UnsafeCell<u64>);

/// Zeroed, word-aligned backing memory.
struct Storage {
    words: Box<[Word]>,
}

impl Storage {
    fn zeroed(bytes: usize) -> Self {
        let words = bytes.div_ceil(mem::size_of::<Word>());
        Self {
            words: (0..words).map(|_| Word(UnsafeCell::new(0))).collect(),
        }
    }

    fn len_bytes(&self) -> usize {
        self.words.len() * mem::size_of::<Word>()
    }

    /// Base pointer usable for writes by any holder of `&self`.
    fn base_ptr(&self) -> *mut u8 {
        // `Word` is `repr(C)` with the cell as its only field, at offset 0.
        UnsafeCell::raw_get(self.words.as_ptr().cast::<UnsafeCell<u64>>()).cast::<u8>()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len_bytes();
        // SAFETY: `&mut self` excludes every other access to the words, and
        // `len` covers exactly the boxed allocation.
        unsafe { slice::from_raw_parts_mut(self.base_ptr(), len) }
    }
}

/// Builder for an [`AoSoA`] with vector length `V`.
///
/// ```
/// use flock_core::Orientation;
/// use flock_slice::AoSoA;
///
/// let particles = AoSoA::<16>::builder()
///     .member::<[f64; 3]>("position")
///     .member::<i32>("species")
///     .orientation(Orientation::ColumnMajor)
///     .build(100)
///     .unwrap();
/// assert_eq!(particles.num_soa(), 7);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AoSoABuilder<const V: usize> {
    members: Vec<(String, MemberInfo)>,
    orientation: Orientation,
}

impl<const V: usize> AoSoABuilder<V> {
    /// Register a member of type `M`. Members are laid out in call order.
    pub fn member<M: Member>(mut self, name: impl Into<String>) -> Self {
        self.members.push((name.into(), MemberInfo::of::<M>()));
        self
    }

    /// Element ordering inside struct blocks. Defaults to row-major.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Allocate storage for `num_particles` zeroed particles.
    pub fn build(self, num_particles: usize) -> Result<AoSoA<V>, CollectionError> {
        let vector_length = Index::<V>::VECTOR_LENGTH;
        let schema = MemberSchema::new(self.members, vector_length)?;
        let num_soa = Index::<V>::num_soa(num_particles);
        let bytes = storage_bytes(&schema, num_soa, num_particles)?;
        let storage = Storage::zeroed(bytes);

        tracing::debug!(
            num_particles,
            num_soa,
            vector_length,
            members = schema.len(),
            struct_bytes = schema.struct_bytes(),
            orientation = ?self.orientation,
            "AoSoA allocated"
        );

        Ok(AoSoA {
            schema,
            orientation: self.orientation,
            size: num_particles,
            num_soa,
            storage,
        })
    }
}

/// An owned collection of particles in AoSoA layout with `V` lanes per
/// struct block.
pub struct AoSoA<const V: usize> {
    schema: MemberSchema,
    orientation: Orientation,
    size: usize,
    num_soa: usize,
    storage: Storage,
}

// SAFETY: shared access to the storage only happens through `FieldSlice`,
// whose access policies carry the data-race contract. Reallocation needs
// `&mut self`.
unsafe impl<const V: usize> Sync for AoSoA<V> {}

impl<const V: usize> AoSoA<V> {
    /// Start describing a collection.
    pub fn builder() -> AoSoABuilder<V> {
        AoSoABuilder::default()
    }

    /// Default-access slice of member `member` (registration index).
    pub fn slice<M: Member>(
        &self,
        member: usize,
    ) -> Result<FieldSlice<'_, M, V, DefaultAccess>, CollectionError> {
        self.slice_with::<M, DefaultAccess>(member)
    }

    /// Slice of member `member` under access policy `P`.
    ///
    /// Fails if the index is unknown or `M` is not the registered type.
    pub fn slice_with<M: Member, P: AccessPolicy>(
        &self,
        member: usize,
    ) -> Result<FieldSlice<'_, M, V, P>, CollectionError> {
        let (name, entry) = self
            .schema
            .get(member)
            .ok_or_else(|| CollectionError::UnknownMember {
                member: member.to_string(),
            })?;
        self.member_slice(name, entry)
    }

    /// Default-access slice of the member called `name`.
    pub fn slice_by_name<M: Member>(
        &self,
        name: &str,
    ) -> Result<FieldSlice<'_, M, V, DefaultAccess>, CollectionError> {
        self.slice_by_name_with::<M, DefaultAccess>(name)
    }

    /// Slice of the member called `name` under access policy `P`.
    pub fn slice_by_name_with<M: Member, P: AccessPolicy>(
        &self,
        name: &str,
    ) -> Result<FieldSlice<'_, M, V, P>, CollectionError> {
        let (_, entry) =
            self.schema
                .get_by_name(name)
                .ok_or_else(|| CollectionError::UnknownMember {
                    member: name.to_owned(),
                })?;
        self.member_slice(name, entry)
    }

    fn member_slice<M: Member, P: AccessPolicy>(
        &self,
        name: &str,
        entry: &MemberEntry,
    ) -> Result<FieldSlice<'_, M, V, P>, CollectionError> {
        if !entry.info.is::<M>() {
            return Err(CollectionError::MemberTypeMismatch {
                member: name.to_owned(),
                declared: entry.info.type_name(),
                requested: type_name::<M>(),
            });
        }

        // Struct bytes are a multiple of 8 and element sizes divide 8.
        let struct_stride = self.schema.struct_bytes() / mem::size_of::<M::Value>();
        let data = if self.num_soa == 0 {
            ptr::null_mut()
        } else {
            // SAFETY: `byte_offset` lies inside the first struct block, which
            // exists because `num_soa > 0`.
            unsafe { self.storage.base_ptr().add(entry.byte_offset) }.cast::<M::Value>()
        };

        // SAFETY: the storage holds `num_soa * struct_bytes` zero-initialised
        // bytes, aligned to 8 at every member offset, stays allocated and
        // unmoved while `&self` is borrowed, and is interior-mutable.
        let slice = unsafe {
            FieldSlice::from_raw_parts(
                data,
                self.size,
                struct_stride,
                self.num_soa,
                self.orientation,
            )
        }?;
        Ok(slice)
    }

    /// Change the particle count, preserving the first `min(old, new)`
    /// particles. New particles are zeroed.
    ///
    /// Every outstanding slice borrows `self`, so none can survive this call.
    pub fn resize(&mut self, num_particles: usize) -> Result<(), CollectionError> {
        let num_soa = Index::<V>::num_soa(num_particles);
        let bytes = storage_bytes(&self.schema, num_soa, num_particles)?;
        let kept = self.size.min(num_particles);
        let full_structs = kept / V;
        let tail_lanes = kept % V;
        let struct_bytes = self.schema.struct_bytes();

        let mut old = mem::replace(&mut self.storage, Storage::zeroed(bytes));
        let src = old.bytes_mut();
        let dst = self.storage.bytes_mut();

        let whole = full_structs * struct_bytes;
        dst[..whole].copy_from_slice(&src[..whole]);
        if tail_lanes > 0 {
            for (_, entry) in self.schema.iter() {
                let base = whole + entry.byte_offset;
                let size = entry.info.value_size();
                let len = entry.info.len();
                match self.orientation {
                    Orientation::RowMajor => {
                        let range = base..base + tail_lanes * len * size;
                        dst[range.clone()].copy_from_slice(&src[range]);
                    }
                    Orientation::ColumnMajor => {
                        for k in 0..len {
                            let start = base + k * V * size;
                            let range = start..start + tail_lanes * size;
                            dst[range.clone()].copy_from_slice(&src[range]);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            old_size = self.size,
            new_size = num_particles,
            num_soa,
            "AoSoA resized"
        );

        self.size = num_particles;
        self.num_soa = num_soa;
        Ok(())
    }

    /// Number of particles.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of struct blocks.
    pub fn num_soa(&self) -> usize {
        self.num_soa
    }

    /// Lanes per struct block.
    pub const fn vector_length(&self) -> usize {
        V
    }

    /// Element ordering inside struct blocks.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The member table.
    pub fn schema(&self) -> &MemberSchema {
        &self.schema
    }

    /// Number of members.
    pub fn num_members(&self) -> usize {
        self.schema.len()
    }

    /// Registration index of the member called `name`.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.schema.index_of(name)
    }

    /// Bytes held by the backing storage.
    pub fn memory_bytes(&self) -> usize {
        self.storage.len_bytes()
    }
}

impl<const V: usize> ParticleStorage<V> for AoSoA<V> {
    fn num_particles(&self) -> usize {
        self.size
    }

    fn num_soa(&self) -> usize {
        self.num_soa
    }
}

impl<const V: usize> fmt::Debug for AoSoA<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AoSoA")
            .field("vector_length", &V)
            .field("size", &self.size)
            .field("num_soa", &self.num_soa)
            .field("orientation", &self.orientation)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

fn storage_bytes(
    schema: &MemberSchema,
    num_soa: usize,
    num_particles: usize,
) -> Result<usize, CollectionError> {
    num_soa
        .checked_mul(schema.struct_bytes())
        .ok_or(CollectionError::CapacityOverflow { num_particles })
}
