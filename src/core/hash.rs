//! State Hashing for Verification
//!
//! SHA-256 digest of match state, used to check that two runs fed the same
//! tick and event sequence end in the same place.
//!
//! Values feed themselves into a [`StateHasher`] through [`StateDigest`],
//! so the byte layout of each type is fixed in one spot:
//!
//! | Type          | Encoding                              |
//! |---------------|---------------------------------------|
//! | integers      | little-endian                         |
//! | `f64`         | bit pattern, little-endian            |
//! | `bool`        | one byte                              |
//! | `str`         | u64 length prefix, then UTF-8 bytes   |
//! | `Option<T>`   | tag byte, then the value if present   |
//! | `BlockPos`    | x, y, z                               |

use sha2::{Digest, Sha256};

use crate::core::pos::BlockPos;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Domain separator for [`StateHasher::for_match_state`].
pub const MATCH_STATE_DOMAIN: &[u8] = b"UHC_MATCH_STATE_V1";

/// A value with a fixed, order-sensitive byte encoding for state hashing.
pub trait StateDigest {
    /// Feed this value into `hasher`.
    fn digest(&self, hasher: &mut StateHasher);
}

/// Incremental state hasher. Update order is part of the hash.
pub struct StateHasher {
    inner: Sha256,
}

impl StateHasher {
    /// Start a hash under a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut inner = Sha256::new();
        inner.update(domain);
        Self { inner }
    }

    /// Hasher for [`crate::game::MatchEngine::state_hash`].
    pub fn for_match_state() -> Self {
        Self::new(MATCH_STATE_DOMAIN)
    }

    /// Feed raw bytes, with no framing.
    #[inline]
    pub fn raw(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Feed one value.
    #[inline]
    pub fn put<T: StateDigest + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.digest(self);
        self
    }

    /// Feed every value of a sequence, prefixed by its length.
    pub fn put_all<'a, T, I>(&mut self, values: I) -> &mut Self
    where
        T: StateDigest + 'a,
        I: ExactSizeIterator<Item = &'a T>,
    {
        self.put(&(values.len() as u64));
        for value in values {
            self.put(value);
        }
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> StateHash {
        self.inner.finalize().into()
    }
}

macro_rules! digest_le {
    ($($ty:ty),*) => {
        $(
            impl StateDigest for $ty {
                #[inline]
                fn digest(&self, hasher: &mut StateHasher) {
                    hasher.raw(&self.to_le_bytes());
                }
            }
        )*
    };
}

digest_le!(u8, u32, u64, i32, i64);

impl StateDigest for f64 {
    #[inline]
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.put(&self.to_bits());
    }
}

impl StateDigest for bool {
    #[inline]
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.put(&u8::from(*self));
    }
}

impl StateDigest for str {
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.put(&(self.len() as u64));
        hasher.raw(self.as_bytes());
    }
}

impl StateDigest for String {
    fn digest(&self, hasher: &mut StateHasher) {
        self.as_str().digest(hasher);
    }
}

impl StateDigest for [u8; 16] {
    #[inline]
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.raw(self);
    }
}

impl<T: StateDigest> StateDigest for Option<T> {
    fn digest(&self, hasher: &mut StateHasher) {
        match self {
            Some(value) => {
                hasher.put(&1u8).put(value);
            }
            None => {
                hasher.put(&0u8);
            }
        }
    }
}

impl StateDigest for BlockPos {
    fn digest(&self, hasher: &mut StateHasher) {
        hasher.put(&self.x).put(&self.y).put(&self.z);
    }
}

/// Hash of the match at `tick`. The closure adds engine state after the tick.
pub fn compute_state_hash<F>(tick: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_match_state();
    hasher.put(&tick);
    add_state(&mut hasher);
    hasher.finalize()
}
