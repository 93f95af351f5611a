//! Deterministic secret derivation.
//!
//! Every secret a wallet mints is a pure function of its root key, a chain
//! code and a depth:
//!
//! ```text
//! tag    = SHA256("webcashwalletv1")
//! serial = hex(SHA256(tag || tag || root || be64(chaincode) || be64(depth)))
//! ```
//!
//! `tag || tag` is exactly one block, so its chaining state is computed once
//! per process and every derivation costs a single compression.
//!
//! **This construction is FROZEN.** Changing any byte strands every wallet
//! backed up under the old rules.

use std::fmt;
use std::sync::OnceLock;

use rand::RngCore;
use zeroize::Zeroizing;

use crate::amount::Amount;
use crate::crypto::{Sha256Hash, Sha256Midstate, BLOCK_LEN, LANES};
use crate::error::{Error, Result};
use crate::secret::Secret;

/// Domain tag hashed into every derivation.
pub const WALLET_TAG: &[u8] = b"webcashwalletv1";

/// Length of a derived serial in hex characters.
pub const SERIAL_HEX_LEN: usize = 64;

/// One derived serial: 64 lowercase hex bytes.
pub type SerialHex = [u8; SERIAL_HEX_LEN];

/// root(32) || chaincode(8) || depth(8)
const MESSAGE_LEN: usize = 48;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A wallet's 32-byte derivation root. Wiped on drop.
#[derive(Clone)]
pub struct DerivationRoot(Zeroizing<[u8; 32]>);

impl DerivationRoot {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Parse 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(s, &mut *bytes).map_err(|e| Error::invalid(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Draw a fresh root from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; 32]);
        rand::thread_rng().fill_bytes(&mut *bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&*self.0))
    }
}

impl fmt::Debug for DerivationRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivationRoot(<redacted>)")
    }
}

/// Conventional chain codes used by webcash wallets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainCode {
    /// Secrets handed out to payers.
    Receive,
    /// Secrets created when paying someone.
    Pay,
    /// Change returned from a payment.
    Change,
    /// Secrets claimed by mining.
    Mining,
    Other(u64),
}

impl ChainCode {
    pub const fn as_u64(self) -> u64 {
        match self {
            ChainCode::Receive => 0,
            ChainCode::Pay => 1,
            ChainCode::Change => 2,
            ChainCode::Mining => 3,
            ChainCode::Other(code) => code,
        }
    }
}

impl From<ChainCode> for u64 {
    fn from(chain: ChainCode) -> Self {
        chain.as_u64()
    }
}

impl From<u64> for ChainCode {
    fn from(code: u64) -> Self {
        match code {
            0 => ChainCode::Receive,
            1 => ChainCode::Pay,
            2 => ChainCode::Change,
            3 => ChainCode::Mining,
            other => ChainCode::Other(other),
        }
    }
}

static GLOBAL: OnceLock<DerivationContext> = OnceLock::new();

/// Precomputed state for the tagged derivation hash.
///
/// Immutable once built; share it freely across threads.
#[derive(Clone, Debug)]
pub struct DerivationContext {
    midstate: Sha256Midstate,
}

impl DerivationContext {
    /// Hash the wallet tag and capture the `tag || tag` midstate.
    pub fn new() -> Self {
        let tag = Sha256Hash::hash(WALLET_TAG);
        let mut prefix = [0u8; BLOCK_LEN];
        prefix[..32].copy_from_slice(tag.as_bytes());
        prefix[32..].copy_from_slice(tag.as_bytes());
        Self {
            midstate: Sha256Midstate::from_block(&prefix),
        }
    }

    /// The process-wide context, built on first use.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            tracing::debug!("computing wallet derivation midstate");
            Self::new()
        })
    }

    /// Derive `out.len()` consecutive serials starting at `start_depth`.
    ///
    /// Identical to calling [`derive_one`](Self::derive_one) per depth.
    /// Depths wrap modulo 2^64.
    pub fn derive_batch(
        &self,
        root: &DerivationRoot,
        chaincode: impl Into<u64>,
        start_depth: u64,
        out: &mut [SerialHex],
    ) {
        let chaincode = chaincode.into();
        let leftover = out.len() % LANES;
        let (partial, full) = out.split_at_mut(leftover);
        if !partial.is_empty() {
            self.derive_group(root, chaincode, start_depth, partial);
        }

        let mut depth = start_depth.wrapping_add(leftover as u64);
        for group in full.chunks_exact_mut(LANES) {
            self.derive_group(root, chaincode, depth, group);
            depth = depth.wrapping_add(LANES as u64);
        }
    }

    /// Derive a single serial as an owned string.
    pub fn derive_one(
        &self,
        root: &DerivationRoot,
        chaincode: impl Into<u64>,
        depth: u64,
    ) -> Result<Zeroizing<String>> {
        let serial = self.derive_raw(root, chaincode.into(), depth);
        let mut text = Zeroizing::new(String::new());
        text.try_reserve_exact(SERIAL_HEX_LEN)?;
        text.extend(serial.iter().map(|&b| char::from(b)));
        Ok(text)
    }

    /// Derive the secret at `depth` and attach `amount` to it.
    pub fn derive_secret(
        &self,
        root: &DerivationRoot,
        chaincode: impl Into<u64>,
        depth: u64,
        amount: Amount,
    ) -> Result<Secret> {
        let serial = self.derive_raw(root, chaincode.into(), depth);
        let mut buf = Vec::new();
        buf.try_reserve_exact(SERIAL_HEX_LEN)?;
        buf.extend_from_slice(&*serial);
        Ok(Secret::from_vec(amount, buf))
    }

    fn derive_raw(&self, root: &DerivationRoot, chaincode: u64, depth: u64) -> Zeroizing<SerialHex> {
        let mut serial = Zeroizing::new([0u8; SERIAL_HEX_LEN]);
        self.derive_batch(root, chaincode, depth, std::slice::from_mut(&mut *serial));
        serial
    }

    /// Derive at most [`LANES`] serials in one batched hash call.
    fn derive_group(
        &self,
        root: &DerivationRoot,
        chaincode: u64,
        depth: u64,
        out: &mut [SerialHex],
    ) {
        let lanes = out.len();
        let mut blocks = Zeroizing::new([[0u8; BLOCK_LEN]; LANES]);
        for (i, block) in blocks[..lanes].iter_mut().enumerate() {
            block[..32].copy_from_slice(root.as_bytes());
            block[32..40].copy_from_slice(&chaincode.to_be_bytes());
            block[40..48].copy_from_slice(&depth.wrapping_add(i as u64).to_be_bytes());
            self.midstate.pad_into(block, MESSAGE_LEN);
        }

        let mut digests = Zeroizing::new([[0u8; 32]; LANES]);
        self.midstate
            .finish_lanes(&blocks[..lanes], &mut digests[..lanes]);

        for (serial, digest) in out.iter_mut().zip(digests.iter()) {
            serial[..32].copy_from_slice(digest);
            expand_hex_in_place(serial);
        }
    }
}

impl Default for DerivationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn the 32 digest bytes at the front of `buf` into 64 hex characters.
///
/// Walks from the last byte down: byte `i` lands in `2i` and `2i + 1`,
/// which are never below `i`, so unread input is never overwritten.
fn expand_hex_in_place(buf: &mut SerialHex) {
    for i in (0..SERIAL_HEX_LEN / 2).rev() {
        let byte = buf[i];
        buf[2 * i] = HEX_DIGITS[usize::from(byte >> 4)];
        buf[2 * i + 1] = HEX_DIGITS[usize::from(byte & 0x0f)];
    }
}

/// [`DerivationContext::derive_batch`] on the global context.
pub fn derive_batch(
    root: &DerivationRoot,
    chaincode: impl Into<u64>,
    start_depth: u64,
    out: &mut [SerialHex],
) {
    DerivationContext::global().derive_batch(root, chaincode, start_depth, out)
}

/// [`DerivationContext::derive_one`] on the global context.
pub fn derive_one(
    root: &DerivationRoot,
    chaincode: impl Into<u64>,
    depth: u64,
) -> Result<Zeroizing<String>> {
    DerivationContext::global().derive_one(root, chaincode, depth)
}

/// [`DerivationContext::derive_secret`] on the global context.
pub fn derive_secret(
    root: &DerivationRoot,
    chaincode: impl Into<u64>,
    depth: u64,
    amount: Amount,
) -> Result<Secret> {
    DerivationContext::global().derive_secret(root, chaincode, depth, amount)
}
