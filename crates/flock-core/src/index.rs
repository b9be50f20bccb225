//! Particle id ↔ `(struct, inner)` index decomposition.
//!
//! A collection of `n` particles is split into struct blocks of `V` lanes.
//! Particle `p` lives in struct `p / V` at lane `p % V`. `V` is a const
//! generic so the division folds to a shift and mask when `V` is a power of
//! two, while any positive `V` remains valid.

/// Index arithmetic for a vector length of `V` lanes per struct block.
///
/// `Index::<0>` is rejected at compile time: every function below reads
/// [`Index::VECTOR_LENGTH`], whose evaluation fails for `V == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Index<const V: usize>;

impl<const V: usize> Index<V> {
    /// Number of lanes per struct block.
    pub const VECTOR_LENGTH: usize = {
        assert!(V > 0, "vector length must be positive");
        V
    };

    /// Struct id of particle `p`.
    #[inline(always)]
    pub const fn s(p: usize) -> usize {
        p / Self::VECTOR_LENGTH
    }

    /// Inner (lane) id of particle `p`.
    #[inline(always)]
    pub const fn i(p: usize) -> usize {
        p % Self::VECTOR_LENGTH
    }

    /// Particle id at struct `s`, lane `i`.
    #[inline(always)]
    pub const fn p(s: usize, i: usize) -> usize {
        s * Self::VECTOR_LENGTH + i
    }

    /// `(s(p), i(p))` in one call.
    #[inline(always)]
    pub const fn decompose(p: usize) -> (usize, usize) {
        (Self::s(p), Self::i(p))
    }

    /// Number of struct blocks needed for `n` particles: `ceil(n / V)`.
    #[inline(always)]
    pub const fn num_soa(n: usize) -> usize {
        n.div_ceil(Self::VECTOR_LENGTH)
    }

    /// Number of valid lanes in struct `s` of a collection of `n` particles.
    ///
    /// Every struct but the last is full. The last holds the remainder, or a
    /// full `V` when `n` is an exact multiple of `V`. Only meaningful for
    /// `n > 0` and `s < num_soa(n)`.
    #[inline(always)]
    pub const fn array_size(n: usize, s: usize) -> usize {
        debug_assert!(n > 0, "array_size is undefined for an empty collection");
        debug_assert!(s < Self::num_soa(n), "struct id out of range");
        let remaining = n - s * Self::VECTOR_LENGTH;
        if remaining < Self::VECTOR_LENGTH {
            remaining
        } else {
            Self::VECTOR_LENGTH
        }
    }
}
