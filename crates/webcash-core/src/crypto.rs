//! SHA-256 with explicit midstate access.
//!
//! Wraps the `sha2` crate: one-shot hashing for public hashes, and raw
//! block compression over a captured chaining state for derivation and
//! mining, where thousands of messages share a fixed prefix.

use std::fmt;

use sha2::digest::consts::U64;
use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// SHA-256 block length in bytes.
pub const BLOCK_LEN: usize = 64;

/// Number of independent messages finished per batched call.
pub const LANES: usize = 8;

/// Largest tail that still fits a single final block with its padding.
pub const MAX_TAIL_LEN: usize = BLOCK_LEN - 1 - 8;

const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
    0x5be0cd19,
];

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr).map_err(|e| Error::invalid(e.to_string()))?;
        Ok(Self(arr))
    }

    /// Count of leading zero bits, the proof-of-work measure.
    pub fn leading_zero_bits(&self) -> u32 {
        let mut bits = 0;
        for byte in self.0 {
            bits += byte.leading_zeros();
            if byte != 0 {
                break;
            }
        }
        bits
    }

    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// SHA-256 chaining state after a whole number of blocks.
///
/// Copying a midstate and compressing one more block per message gives the
/// same digest as hashing `prefix || message` from scratch.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sha256Midstate {
    state: [u32; 8],
    consumed: u64,
}

impl Sha256Midstate {
    /// The state before any input.
    pub const fn initial() -> Self {
        Self {
            state: IV,
            consumed: 0,
        }
    }

    /// Absorb exactly one block.
    pub fn from_block(block: &[u8; BLOCK_LEN]) -> Self {
        let mut state = IV;
        compress(&mut state, block);
        Self {
            state,
            consumed: BLOCK_LEN as u64,
        }
    }

    /// Absorb `prefix`, which must be a whole number of blocks.
    pub fn from_prefix(prefix: &[u8]) -> Result<Self> {
        let mut midstate = Self::initial();
        midstate.absorb(prefix)?;
        Ok(midstate)
    }

    /// Absorb more whole blocks.
    pub fn absorb(&mut self, blocks: &[u8]) -> Result<()> {
        if blocks.len() % BLOCK_LEN != 0 {
            return Err(Error::invalid(format!(
                "midstate input of {} bytes is not a multiple of {BLOCK_LEN}",
                blocks.len()
            )));
        }
        for block in blocks.chunks_exact(BLOCK_LEN) {
            compress(&mut self.state, block);
        }
        self.consumed += blocks.len() as u64;
        Ok(())
    }

    /// Bytes absorbed so far.
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Build the final padded block for `tail`.
    ///
    /// The length field covers everything absorbed plus the tail.
    pub fn pad_block(&self, tail: &[u8]) -> Result<[u8; BLOCK_LEN]> {
        if tail.len() > MAX_TAIL_LEN {
            return Err(Error::invalid(format!(
                "tail of {} bytes does not fit one final block",
                tail.len()
            )));
        }
        let mut block = [0u8; BLOCK_LEN];
        self.pad_into(&mut block, tail.len());
        block[..tail.len()].copy_from_slice(tail);
        Ok(block)
    }

    /// Write padding for a tail of `tail_len` bytes already in `block`.
    pub(crate) fn pad_into(&self, block: &mut [u8; BLOCK_LEN], tail_len: usize) {
        block[tail_len] = 0x80;
        block[tail_len + 1..BLOCK_LEN - 8].fill(0);
        let bits = (self.consumed + tail_len as u64) * 8;
        block[BLOCK_LEN - 8..].copy_from_slice(&bits.to_be_bytes());
    }

    /// Finish one padded final block.
    pub fn finish(&self, block: &[u8; BLOCK_LEN]) -> Sha256Hash {
        let mut digest = Sha256Hash([0u8; 32]);
        self.finish_into(block, &mut digest.0);
        digest
    }

    /// Finish up to [`LANES`] independent final blocks from this midstate.
    ///
    /// `out[i]` receives the digest of `blocks[i]`; extra `out` slots are
    /// left untouched.
    pub fn finish_lanes(&self, blocks: &[[u8; BLOCK_LEN]], out: &mut [[u8; 32]]) {
        debug_assert!(blocks.len() <= LANES && blocks.len() <= out.len());
        for (block, digest) in blocks.iter().zip(out.iter_mut()) {
            self.finish_into(block, digest);
        }
    }

    /// Digest of `block` into `digest`; the working chaining state is wiped.
    fn finish_into(&self, block: &[u8; BLOCK_LEN], digest: &mut [u8; 32]) {
        let mut state = Zeroizing::new(self.state);
        compress(&mut state, block);
        for (chunk, word) in digest.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
    }
}

impl Default for Sha256Midstate {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for Sha256Midstate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha256Midstate")
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

fn compress(state: &mut [u32; 8], block: &[u8]) {
    let block = GenericArray::<u8, U64>::from_slice(block);
    sha2::compress256(state, std::slice::from_ref(block));
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_sha256_hash() {
        assert_eq!(Sha256Hash::hash(b"abc").to_hex(), ABC);
        assert_ne!(Sha256Hash::hash(b"abc"), Sha256Hash::hash(b"abd"));
    }

    #[test]
    fn test_hex_roundtrip() {
        let h = Sha256Hash::hash(b"abc");
        assert_eq!(Sha256Hash::from_hex(ABC).unwrap(), h);
        assert_eq!(Sha256Hash::from_hex(&ABC.to_uppercase()).unwrap(), h);
        assert!(Sha256Hash::from_hex(&ABC[..62]).is_err());
        assert!(Sha256Hash::from_hex(&ABC.replace('b', "g")).is_err());
    }

    #[test]
    fn test_initial_midstate_matches_oneshot() {
        let midstate = Sha256Midstate::initial();
        let block = midstate.pad_block(b"abc").unwrap();
        assert_eq!(midstate.finish(&block).to_hex(), ABC);
    }

    #[test]
    fn test_midstate_continuation() {
        let prefix = [0x5au8; 128];
        let tail = b"hello midstate";
        let midstate = Sha256Midstate::from_prefix(&prefix).unwrap();
        assert_eq!(midstate.consumed(), 128);

        let mut first = [0u8; BLOCK_LEN];
        first.copy_from_slice(&prefix[..BLOCK_LEN]);
        assert_eq!(
            Sha256Midstate::from_block(&first),
            Sha256Midstate::from_prefix(&prefix[..BLOCK_LEN]).unwrap()
        );

        let mut whole = prefix.to_vec();
        whole.extend_from_slice(tail);
        let block = midstate.pad_block(tail).unwrap();
        assert_eq!(midstate.finish(&block), Sha256Hash::hash(&whole));
    }

    #[test]
    fn test_midstate_rejects_partial_blocks() {
        assert!(Sha256Midstate::from_prefix(&[0u8; 63]).is_err());
        assert!(Sha256Midstate::initial().pad_block(&[0u8; 56]).is_err());
        assert!(Sha256Midstate::initial().pad_block(&[0u8; 55]).is_ok());
    }

    #[test]
    fn test_finish_lanes() {
        let midstate = Sha256Midstate::from_prefix(&[7u8; 64]).unwrap();
        let tails: Vec<Vec<u8>> = (0..LANES as u8).map(|i| vec![i; 12]).collect();
        let blocks: Vec<[u8; BLOCK_LEN]> = tails
            .iter()
            .map(|t| midstate.pad_block(t).unwrap())
            .collect();
        let mut out = [[0u8; 32]; LANES];
        midstate.finish_lanes(&blocks, &mut out);
        for (tail, digest) in tails.iter().zip(out) {
            let mut whole = vec![7u8; 64];
            whole.extend_from_slice(tail);
            assert_eq!(Sha256Hash(digest), Sha256Hash::hash(&whole));
        }
    }

    #[test]
    fn test_finish_agrees_with_lanes() {
        let midstate = Sha256Midstate::from_block(&[0x5a; BLOCK_LEN]);
        let blocks = [
            midstate.pad_block(b"lane zero").unwrap(),
            midstate.pad_block(b"lane one").unwrap(),
        ];
        let mut out = [[0xeeu8; 32]; LANES];
        midstate.finish_lanes(&blocks, &mut out);
        assert_eq!(Sha256Hash(out[0]), midstate.finish(&blocks[0]));
        assert_eq!(Sha256Hash(out[1]), midstate.finish(&blocks[1]));
        assert!(out[2..].iter().all(|d| *d == [0xee; 32]));

        let mut whole = vec![0x5a; BLOCK_LEN];
        whole.extend_from_slice(b"lane one");
        assert_eq!(midstate.finish(&blocks[1]), Sha256Hash::hash(&whole));
        // Finishing does not disturb the midstate itself.
        assert_eq!(midstate, Sha256Midstate::from_block(&[0x5a; BLOCK_LEN]));
    }

    #[test]
    fn test_leading_zero_bits() {
        let mut bytes = [0xffu8; 32];
        assert_eq!(Sha256Hash(bytes).leading_zero_bits(), 0);
        bytes[0] = 0;
        bytes[1] = 0x0f;
        assert_eq!(Sha256Hash(bytes).leading_zero_bits(), 12);
        assert_eq!(Sha256Hash::ZERO.leading_zero_bits(), 256);
    }
}
