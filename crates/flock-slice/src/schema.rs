//! Member schema: name → (type description, byte offset within a struct).
//!
//! A [`MemberSchema`] fixes the byte layout of one struct block. Members are
//! laid out in registration order, each occupying `V * particle_bytes`
//! bytes, starting on an 8-byte boundary. The struct block size is rounded
//! up to 8 bytes so that every struct, and therefore every member region,
//! stays aligned for any supported element type.

use flock_core::MemberInfo;
use indexmap::IndexMap;

use crate::error::CollectionError;

/// Alignment of every member region and of the struct block, in bytes.
pub const MEMBER_ALIGN: usize = 8;

/// A single member of a schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberEntry {
    /// Type description captured at registration.
    pub info: MemberInfo,
    /// Byte offset of the member's region from the start of a struct block.
    pub byte_offset: usize,
}

impl MemberEntry {
    /// Bytes occupied by this member in one struct block.
    pub fn region_bytes(&self, vector_length: usize) -> usize {
        self.info.particle_bytes() * vector_length
    }
}

/// Ordered member table of an AoSoA.
///
/// Iteration follows registration order, which is also the order of the
/// member regions inside a struct block.
#[derive(Clone, Debug)]
pub struct MemberSchema {
    entries: IndexMap<String, MemberEntry>,
    vector_length: usize,
    struct_bytes: usize,
}

impl MemberSchema {
    /// Lay out `members` for struct blocks of `vector_length` lanes.
    pub fn new(
        members: Vec<(String, MemberInfo)>,
        vector_length: usize,
    ) -> Result<Self, CollectionError> {
        if members.is_empty() {
            return Err(CollectionError::NoMembers);
        }
        let overflow = CollectionError::CapacityOverflow {
            num_particles: vector_length,
        };

        let mut entries = IndexMap::with_capacity(members.len());
        let mut cursor = 0usize;
        for (name, info) in members {
            if entries.contains_key(&name) {
                return Err(CollectionError::DuplicateMember { name });
            }
            let byte_offset = align_up(cursor).ok_or_else(|| overflow.clone())?;
            let region = info
                .particle_bytes()
                .checked_mul(vector_length)
                .ok_or_else(|| overflow.clone())?;
            cursor = byte_offset
                .checked_add(region)
                .ok_or_else(|| overflow.clone())?;
            entries.insert(name, MemberEntry { info, byte_offset });
        }
        let struct_bytes = align_up(cursor).ok_or(overflow)?;

        Ok(Self {
            entries,
            vector_length,
            struct_bytes,
        })
    }

    /// Look up a member by registration index.
    pub fn get(&self, index: usize) -> Option<(&str, &MemberEntry)> {
        self.entries
            .get_index(index)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Look up a member by name, returning its index and entry.
    pub fn get_by_name(&self, name: &str) -> Option<(usize, &MemberEntry)> {
        self.entries
            .get_full(name)
            .map(|(index, _, entry)| (index, entry))
    }

    /// Registration index of the member called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Iterate over `(name, entry)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no members. Never true for a built schema.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lanes per struct block.
    pub fn vector_length(&self) -> usize {
        self.vector_length
    }

    /// Bytes in one struct block, including padding.
    pub fn struct_bytes(&self) -> usize {
        self.struct_bytes
    }
}

fn align_up(bytes: usize) -> Option<usize> {
    bytes
        .checked_add(MEMBER_ALIGN - 1)
        .map(|b| b / MEMBER_ALIGN * MEMBER_ALIGN)
}
