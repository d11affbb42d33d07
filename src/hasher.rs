//! Hash primitives producing the table's 32-bit digests.
//!
//! Each primitive owns secret key material drawn once from the operating
//! system's random source and is a pure function of `(payload, key)`
//! afterwards. Primitives with a 64-bit digest are folded down to 32 bits by
//! XOR-ing the high half into the low half.

use core::fmt::Debug;

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::Error;
use crate::error::Result;
use crate::spooky;

/// Turns a byte-string key into the 32-bit digest stored in each bucket.
///
/// Implementations must be deterministic for a fixed key: the table never
/// retains keys, so a lookup only succeeds if it recomputes the exact digest
/// computed at insertion.
pub trait KeyHasher {
    /// Hashes `payload` to 32 bits.
    fn fold32(&self, payload: &[u8]) -> u32;
}

impl<H: KeyHasher + ?Sized> KeyHasher for &H {
    #[inline(always)]
    fn fold32(&self, payload: &[u8]) -> u32 {
        (**self).fold32(payload)
    }
}

/// Folds a 64-bit digest into 32 bits.
///
/// Byte `i` of the little-endian digest is XOR-ed with byte `i + 4` and the
/// low four bytes are returned, so every bit of the digest contributes.
///
/// # Examples
///
/// ```rust
/// # use robin_table::hasher::fold64;
/// assert_eq!(fold64(0x0000_0001_0000_0001), 0);
/// assert_eq!(fold64(0xFF00_0000_0000_00FF), 0xFF00_00FF);
/// ```
#[inline(always)]
pub fn fold64(digest: u64) -> u32 {
    let mut bytes = digest.to_le_bytes();
    for i in 0..4 {
        bytes[i] ^= bytes[i + 4];
    }
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn random_u64() -> Result<u64> {
    OsRng
        .try_next_u64()
        .map_err(|err| Error::KeyGeneration(Box::new(err)))
}

fn random_u32() -> Result<u32> {
    OsRng
        .try_next_u32()
        .map_err(|err| Error::KeyGeneration(Box::new(err)))
}

/// SipHash-2-4 with two 64-bit keys, folded to 32 bits.
#[cfg(feature = "sip")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SipHash {
    k0: u64,
    k1: u64,
}

#[cfg(feature = "sip")]
impl SipHash {
    /// Creates a primitive keyed from the OS random source.
    pub fn new() -> Result<Self> {
        Ok(Self::with_keys(random_u64()?, random_u64()?))
    }

    /// Creates a primitive with explicit keys.
    pub fn with_keys(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }
}

#[cfg(feature = "sip")]
impl KeyHasher for SipHash {
    #[inline]
    fn fold32(&self, payload: &[u8]) -> u32 {
        use core::hash::Hasher;

        let mut hasher = siphasher::sip::SipHasher::new_with_keys(self.k0, self.k1);
        hasher.write(payload);
        fold64(hasher.finish())
    }
}

#[cfg(feature = "sip")]
impl Debug for SipHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SipHash").finish_non_exhaustive()
    }
}

/// HighwayHash with a 256-bit key, folded to 32 bits.
#[cfg(feature = "highway")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HighwayHash {
    key: [u64; 4],
}

#[cfg(feature = "highway")]
impl HighwayHash {
    /// Byte length of the key.
    pub const KEY_LEN: usize = 32;

    /// Creates a primitive keyed with 32 bytes from the OS random source.
    pub fn new() -> Result<Self> {
        let mut bytes = [0u8; Self::KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|err| Error::KeyGeneration(Box::new(err)))?;
        Ok(Self::with_key_bytes(bytes))
    }

    /// Creates a primitive from a 32-byte key, read as four little-endian
    /// words.
    pub fn with_key_bytes(bytes: [u8; Self::KEY_LEN]) -> Self {
        let mut key = [0u64; 4];
        for (word, chunk) in key.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut lane = [0u8; 8];
            lane.copy_from_slice(chunk);
            *word = u64::from_le_bytes(lane);
        }
        Self { key }
    }

    /// Creates a primitive with an explicit key.
    pub fn with_key(key: [u64; 4]) -> Self {
        Self { key }
    }
}

#[cfg(feature = "highway")]
impl KeyHasher for HighwayHash {
    #[inline]
    fn fold32(&self, payload: &[u8]) -> u32 {
        use highway::HighwayHash as _;

        let hasher = highway::HighwayHasher::new(highway::Key(self.key));
        fold64(hasher.hash64(payload))
    }
}

#[cfg(feature = "highway")]
impl Debug for HighwayHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HighwayHash").finish_non_exhaustive()
    }
}

/// t1ha1 with a 64-bit seed, folded to 32 bits.
#[cfg(feature = "t1ha")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct T1Hash {
    seed: u64,
}

#[cfg(feature = "t1ha")]
impl T1Hash {
    /// Creates a primitive seeded from the OS random source.
    pub fn new() -> Result<Self> {
        Ok(Self::with_seed(random_u64()?))
    }

    /// Creates a primitive with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

#[cfg(feature = "t1ha")]
impl KeyHasher for T1Hash {
    #[inline]
    fn fold32(&self, payload: &[u8]) -> u32 {
        fold64(t1ha::t1ha1_le(payload, self.seed))
    }
}

#[cfg(feature = "t1ha")]
impl Debug for T1Hash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("T1Hash").finish_non_exhaustive()
    }
}

/// SpookyHash V2 with a 32-bit seed. Its digest is natively 32 bits wide, so
/// no folding is applied.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SpookyHash {
    seed: u32,
}

impl SpookyHash {
    /// Creates a primitive seeded from the OS random source.
    pub fn new() -> Result<Self> {
        Ok(Self::with_seed(random_u32()?))
    }

    /// Creates a primitive with an explicit seed.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl KeyHasher for SpookyHash {
    #[inline]
    fn fold32(&self, payload: &[u8]) -> u32 {
        spooky::hash32(payload, self.seed)
    }
}

impl Debug for SpookyHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpookyHash").finish_non_exhaustive()
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "sip")] {
        /// Primitive used by [`Table::new`](crate::Table::new) callers that do
        /// not pick one: SipHash when the `sip` feature is enabled.
        pub type DefaultHasher = SipHash;
    } else {
        /// Primitive used by [`Table::new`](crate::Table::new) callers that do
        /// not pick one: SpookyHash, as the `sip` feature is disabled.
        pub type DefaultHasher = SpookyHash;
    }
}

/// Selects one of the available hash primitives at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HasherKind {
    /// [`SipHash`]
    #[cfg(feature = "sip")]
    Sip,
    /// [`HighwayHash`]
    #[cfg(feature = "highway")]
    Highway,
    /// [`T1Hash`]
    #[cfg(feature = "t1ha")]
    T1,
    /// [`SpookyHash`]
    Spooky,
}

impl HasherKind {
    /// Every primitive compiled into this build.
    pub const ALL: &'static [HasherKind] = &[
        #[cfg(feature = "sip")]
        HasherKind::Sip,
        #[cfg(feature = "highway")]
        HasherKind::Highway,
        #[cfg(feature = "t1ha")]
        HasherKind::T1,
        HasherKind::Spooky,
    ];

    /// Short lowercase name of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "sip")]
            HasherKind::Sip => "siphash",
            #[cfg(feature = "highway")]
            HasherKind::Highway => "highway",
            #[cfg(feature = "t1ha")]
            HasherKind::T1 => "t1ha",
            HasherKind::Spooky => "spooky",
        }
    }
}

impl core::fmt::Display for HasherKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A hash primitive chosen once at construction from a [`HasherKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnyHasher {
    /// SipHash-2-4
    #[cfg(feature = "sip")]
    Sip(SipHash),
    /// HighwayHash
    #[cfg(feature = "highway")]
    Highway(HighwayHash),
    /// t1ha1
    #[cfg(feature = "t1ha")]
    T1(T1Hash),
    /// SpookyHash V2
    Spooky(SpookyHash),
}

impl AnyHasher {
    /// Creates a freshly keyed primitive of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyGeneration`] if the OS random source fails.
    pub fn new(kind: HasherKind) -> Result<Self> {
        Ok(match kind {
            #[cfg(feature = "sip")]
            HasherKind::Sip => AnyHasher::Sip(SipHash::new()?),
            #[cfg(feature = "highway")]
            HasherKind::Highway => AnyHasher::Highway(HighwayHash::new()?),
            #[cfg(feature = "t1ha")]
            HasherKind::T1 => AnyHasher::T1(T1Hash::new()?),
            HasherKind::Spooky => AnyHasher::Spooky(SpookyHash::new()?),
        })
    }

    /// Which primitive this is.
    pub fn kind(&self) -> HasherKind {
        match self {
            #[cfg(feature = "sip")]
            AnyHasher::Sip(_) => HasherKind::Sip,
            #[cfg(feature = "highway")]
            AnyHasher::Highway(_) => HasherKind::Highway,
            #[cfg(feature = "t1ha")]
            AnyHasher::T1(_) => HasherKind::T1,
            AnyHasher::Spooky(_) => HasherKind::Spooky,
        }
    }
}

impl KeyHasher for AnyHasher {
    #[inline]
    fn fold32(&self, payload: &[u8]) -> u32 {
        match self {
            #[cfg(feature = "sip")]
            AnyHasher::Sip(h) => h.fold32(payload),
            #[cfg(feature = "highway")]
            AnyHasher::Highway(h) => h.fold32(payload),
            #[cfg(feature = "t1ha")]
            AnyHasher::T1(h) => h.fold32(payload),
            AnyHasher::Spooky(h) => h.fold32(payload),
        }
    }
}
