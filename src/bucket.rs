/// A single slot of the bucket array.
///
/// Only the 32-bit digest of a key is stored. Two keys with the same digest
/// are indistinguishable to the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket<V> {
    pub(crate) hash: u32,
    pub(crate) probe_distance: u32,
    pub(crate) value: Option<V>,
}

impl<V> Default for Bucket<V> {
    #[inline(always)]
    fn default() -> Self {
        Self {
            hash: 0,
            probe_distance: 0,
            value: None,
        }
    }
}

impl<V> Bucket<V> {
    /// Digest of the stored key. Meaningless for an empty bucket.
    #[inline(always)]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// How many slots past its ideal index the entry sits.
    #[inline(always)]
    pub fn probe_distance(&self) -> u32 {
        self.probe_distance
    }

    /// The stored value, or `None` for an empty bucket.
    #[inline(always)]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Whether the bucket holds an entry.
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        self.value.is_some()
    }
}
