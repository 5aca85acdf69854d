//! Permutations of the five vertices of a pentachoron.

/// Number of permutations of five elements.
pub const PERM5_COUNT: usize = 120;

const FACTORIALS: [usize; 5] = [24, 6, 2, 1, 1];

/// Permutation of `{0,1,2,3,4}`; `p.apply(i)` is the image of `i`.
///
/// Gluings map the vertices of one pentachoron onto the vertices of its
/// neighbour, so facet `f` is glued to facet `p.apply(f)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Perm5([u8; 5]);

impl Default for Perm5 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Perm5 {
    pub const IDENTITY: Self = Self([0, 1, 2, 3, 4]);

    /// Build from an image array; `None` unless it is a bijection of `0..5`.
    pub fn from_images(images: [u8; 5]) -> Option<Self> {
        let mut seen = 0u8;
        for &v in &images {
            if v >= 5 || seen & (1 << v) != 0 {
                return None;
            }
            seen |= 1 << v;
        }
        Some(Self(images))
    }

    /// Caller guarantees `images` is a bijection of `0..5`.
    pub(crate) fn from_images_trusted(images: [u8; 5]) -> Self {
        debug_assert!(Self::from_images(images).is_some(), "not a permutation: {images:?}");
        Self(images)
    }

    #[inline]
    pub fn apply(self, i: usize) -> usize {
        self.0[i] as usize
    }

    #[inline]
    pub fn images(self) -> [u8; 5] {
        self.0
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(self, other: Self) -> Self {
        let mut out = [0u8; 5];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[other.0[i] as usize];
        }
        Self(out)
    }

    pub fn inverse(self) -> Self {
        let mut out = [0u8; 5];
        for (i, &v) in self.0.iter().enumerate() {
            out[v as usize] = i as u8;
        }
        Self(out)
    }

    /// Image of a vertex bitmask (bit `i` set iff vertex `i` is present).
    pub fn map_mask(self, mask: u8) -> u8 {
        let mut out = 0u8;
        for i in 0..5 {
            if mask & (1 << i) != 0 {
                out |= 1 << self.0[i];
            }
        }
        out
    }

    /// Rank among all permutations in lexicographic order of image arrays.
    pub fn index(self) -> usize {
        let mut idx = 0;
        for i in 0..5 {
            let smaller = (i + 1..5).filter(|&j| self.0[j] < self.0[i]).count();
            idx = idx * (5 - i) + smaller;
        }
        idx
    }

    /// Inverse of [`Perm5::index`].
    pub fn from_index(mut idx: usize) -> Option<Self> {
        if idx >= PERM5_COUNT {
            return None;
        }
        let mut available: Vec<u8> = (0..5).collect();
        let mut out = [0u8; 5];
        for (i, slot) in out.iter_mut().enumerate() {
            let c = idx / FACTORIALS[i];
            idx %= FACTORIALS[i];
            *slot = available.remove(c);
        }
        Some(Self(out))
    }

    /// All 120 permutations in index order.
    pub fn all() -> impl Iterator<Item = Perm5> {
        (0..PERM5_COUNT).filter_map(Perm5::from_index)
    }
}
