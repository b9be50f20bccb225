//! Core abstraction traits shared by collections, slices and dispatch.

use crate::index::Index;

/// Anything that stores particles in struct blocks of `V` lanes.
///
/// Implemented by the owning collection and by field slices. The dispatcher
/// derives its iteration range from this trait, so a range can only be bound
/// to storage with the same vector length.
pub trait ParticleStorage<const V: usize> {
    /// Number of particles.
    fn num_particles(&self) -> usize;

    /// Number of struct blocks, `ceil(num_particles / V)`.
    fn num_soa(&self) -> usize {
        Index::<V>::num_soa(self.num_particles())
    }
}
