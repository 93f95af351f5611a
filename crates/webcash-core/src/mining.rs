//! Proof-of-work hashing for webcash issuance.
//!
//! A mining preimage is the base64 encoding of a JSON object whose last
//! member is `"nonce": <digits>}`. The JSON prefix is space-padded to a
//! multiple of 48 bytes so that its base64 form fills whole hash blocks, and
//! the tail of every candidate is then exactly 12 base64 bytes:
//!
//! ```text
//! base64(prefix) || b64("ddd") || b64("ddd") || b64("}")
//! ```
//!
//! The 4-byte chunks for every 3-digit group are precomputed in
//! [`MINING_NONCES`], so candidates are assembled by splicing bytes.

use base64::prelude::*;

use crate::crypto::{Sha256Hash, Sha256Midstate, BLOCK_LEN, LANES};
use crate::error::{Error, Result};

/// Candidates per 3-digit nonce group.
pub const NONCES_PER_GROUP: usize = 1000;

/// Bytes appended to the midstate per candidate.
const TAIL_LEN: usize = 12;

/// JSON bytes per whole base64 block (48 bytes encode to 64).
const JSON_BLOCK: usize = BLOCK_LEN / 4 * 3;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Standard base64 of the zero-padded decimal strings `"000"` to `"999"`.
pub static MINING_NONCES: [[u8; 4]; NONCES_PER_GROUP] = build_nonce_table();

/// Standard base64 of the closing `}`.
pub const MINING_FINAL: [u8; 4] = [
    BASE64_ALPHABET[(b'}' >> 2) as usize],
    BASE64_ALPHABET[((b'}' & 0x03) << 4) as usize],
    b'=',
    b'=',
];

/// Compile-time base64 of three bytes; `base64` engines are not `const`.
const fn encode_triplet(input: [u8; 3]) -> [u8; 4] {
    let n = (input[0] as u32) << 16 | (input[1] as u32) << 8 | input[2] as u32;
    [
        BASE64_ALPHABET[(n >> 18 & 0x3f) as usize],
        BASE64_ALPHABET[(n >> 12 & 0x3f) as usize],
        BASE64_ALPHABET[(n >> 6 & 0x3f) as usize],
        BASE64_ALPHABET[(n & 0x3f) as usize],
    ]
}

const fn build_nonce_table() -> [[u8; 4]; NONCES_PER_GROUP] {
    let mut table = [[0u8; 4]; NONCES_PER_GROUP];
    let mut i = 0;
    while i < NONCES_PER_GROUP {
        let digits = [
            b'0' + (i / 100) as u8,
            b'0' + (i / 10 % 10) as u8,
            b'0' + (i % 10) as u8,
        ];
        table[i] = encode_triplet(digits);
        i += 1;
    }
    table
}

/// Hash eight candidates sharing `nonce1` and `final_chunk` in one call.
///
/// Lane `i` is `SHA256(prefix || nonce1 || nonce2[i] || final_chunk)`,
/// where `prefix` is whatever `midstate` has absorbed.
pub fn hash_8way(
    midstate: &Sha256Midstate,
    nonce1: &[u8; 4],
    nonce2: &[[u8; 4]; LANES],
    final_chunk: &[u8; 4],
) -> [Sha256Hash; LANES] {
    let mut blocks = [[0u8; BLOCK_LEN]; LANES];
    for (block, lane_nonce) in blocks.iter_mut().zip(nonce2) {
        block[..4].copy_from_slice(nonce1);
        block[4..8].copy_from_slice(lane_nonce);
        block[8..TAIL_LEN].copy_from_slice(final_chunk);
        midstate.pad_into(block, TAIL_LEN);
    }
    let mut digests = [[0u8; 32]; LANES];
    midstate.finish_lanes(&blocks, &mut digests);
    digests.map(Sha256Hash)
}

/// A found proof of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The six-digit nonce, `nonce1 * 1000 + nonce2`.
    pub nonce: u32,
    pub hash: Sha256Hash,
    /// The base64 preimage to submit.
    pub preimage: String,
}

/// A mining preimage prefix with its midstate captured.
#[derive(Debug, Clone)]
pub struct MiningJob {
    prefix: String,
    midstate: Sha256Midstate,
}

impl MiningJob {
    /// Lowest first nonce group; keeps the JSON number free of leading zeros.
    pub const MIN_NONCE1: u16 = 100;

    /// Prepare a job from the JSON text up to and including `"nonce": `.
    pub fn new(json_prefix: &str) -> Result<Self> {
        let mut padded = String::with_capacity(json_prefix.len() + JSON_BLOCK);
        padded.push_str(json_prefix);
        while padded.len() % JSON_BLOCK != 0 {
            padded.push(' ');
        }
        let prefix = BASE64_STANDARD.encode(padded.as_bytes());
        let midstate = Sha256Midstate::from_prefix(prefix.as_bytes())?;
        Ok(Self { prefix, midstate })
    }

    /// The base64 prefix shared by every candidate.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn midstate(&self) -> &Sha256Midstate {
        &self.midstate
    }

    /// Scan the 1000 candidates of one first-nonce group.
    pub fn search_group(&self, difficulty: u32, nonce1: u16) -> Result<Option<Solution>> {
        if !(Self::MIN_NONCE1..NONCES_PER_GROUP as u16).contains(&nonce1) {
            return Err(Error::invalid(format!(
                "nonce group {nonce1} outside {}..{NONCES_PER_GROUP}",
                Self::MIN_NONCE1
            )));
        }
        let head = &MINING_NONCES[usize::from(nonce1)];
        for (batch, lanes) in MINING_NONCES.chunks_exact(LANES).enumerate() {
            let mut nonce2 = [[0u8; 4]; LANES];
            nonce2.copy_from_slice(lanes);
            let hashes = hash_8way(&self.midstate, head, &nonce2, &MINING_FINAL);
            if let Some(lane) = hashes
                .iter()
                .position(|h| h.leading_zero_bits() >= difficulty)
            {
                let low = batch * LANES + lane;
                let nonce = u32::from(nonce1) * NONCES_PER_GROUP as u32 + low as u32;
                tracing::debug!(nonce, difficulty, "mining solution found");
                return Ok(Some(Solution {
                    nonce,
                    hash: hashes[lane],
                    preimage: self.preimage(usize::from(nonce1), low),
                }));
            }
        }
        Ok(None)
    }

    /// Scan every nonce group in order.
    pub fn search(&self, difficulty: u32) -> Option<Solution> {
        (Self::MIN_NONCE1..NONCES_PER_GROUP as u16)
            .find_map(|nonce1| self.search_group(difficulty, nonce1).ok().flatten())
    }

    fn preimage(&self, nonce1: usize, nonce2: usize) -> String {
        let mut out = String::with_capacity(self.prefix.len() + TAIL_LEN);
        out.push_str(&self.prefix);
        for chunk in [&MINING_NONCES[nonce1], &MINING_NONCES[nonce2], &MINING_FINAL] {
            out.extend(chunk.iter().map(|&b| char::from(b)));
        }
        out
    }
}
