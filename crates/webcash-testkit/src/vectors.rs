//! Golden test vectors for cross-implementation verification.
//!
//! Every webcash implementation must produce identical outputs for these
//! inputs. The derivation vectors in particular pin the wallet recovery
//! format: a mismatch means backed-up wallets cannot be restored.

use webcash_core::{derive_one, Amount, DerivationRoot, Error, PublicHash, Secret};

/// The root `00 01 02 .. 1f` used by most derivation vectors.
pub const COUNTING_ROOT: [u8; 32] = {
    let mut bytes = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        bytes[i] = i as u8;
        i += 1;
    }
    bytes
};

/// Expected result of parsing an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountOutcome {
    Parsed { raw: i64, noncanonical: bool },
    Invalid,
    Overflow,
}

/// A decimal amount and how it must parse.
#[derive(Debug, Clone)]
pub struct AmountVector {
    pub text: &'static str,
    pub expected: AmountOutcome,
}

/// A derived serial.
#[derive(Debug, Clone)]
pub struct DerivationVector {
    pub name: &'static str,
    pub root: [u8; 32],
    pub chaincode: u64,
    pub depth: u64,
    /// Expected serial (64 lowercase hex).
    pub serial: &'static str,
}

/// A claim code and the public hash it commits to.
#[derive(Debug, Clone)]
pub struct PublicVector {
    pub secret: &'static str,
    pub public: &'static str,
}

const fn ok(raw: i64, noncanonical: bool) -> AmountOutcome {
    AmountOutcome::Parsed { raw, noncanonical }
}

/// Amount parsing vectors.
pub fn amount_vectors() -> Vec<AmountVector> {
    use AmountOutcome::{Invalid, Overflow};
    [
        ("0", ok(0, false)),
        ("0.", ok(0, true)),
        ("0.00000000", ok(0, true)),
        ("-0", ok(0, true)),
        ("00", ok(0, true)),
        ("0.00000001", ok(1, false)),
        ("1", ok(100_000_000, false)),
        ("1.", ok(100_000_000, true)),
        ("1.1", ok(110_000_000, false)),
        ("1.10", ok(110_000_000, true)),
        ("1.00000001", ok(100_000_001, false)),
        ("1.000000000", ok(100_000_000, true)),
        ("01.5", ok(150_000_000, true)),
        ("-12.345678", ok(-1_234_567_800, false)),
        ("92233720368.54775807", ok(i64::MAX, false)),
        ("-92233720368.54775808", ok(i64::MIN, false)),
        ("92233720368.54775808", Overflow),
        ("-92233720368.54775809", Overflow),
        ("99999999999999999999999", Overflow),
        ("", Invalid),
        ("-", Invalid),
        (".5", Invalid),
        ("+1", Invalid),
        ("1e5", Invalid),
        (" 1", Invalid),
        ("1 ", Invalid),
        ("\"1\"", Invalid),
        ("0.000000001", Invalid),
        ("1.0000000010", Invalid),
    ]
    .into_iter()
    .map(|(text, expected)| AmountVector { text, expected })
    .collect()
}

fn vector(
    name: &'static str,
    root: [u8; 32],
    chaincode: u64,
    depth: u64,
    serial: &'static str,
) -> DerivationVector {
    DerivationVector {
        name,
        root,
        chaincode,
        depth,
        serial,
    }
}

/// Derivation vectors.
pub fn derivation_vectors() -> Vec<DerivationVector> {
    vec![
        vector("receive_0", COUNTING_ROOT, 0, 0, "ab1bee6329f999c713ae8b5122ee6c0d731917415cfb65f1277901cef20679d4"),
        vector("receive_1", COUNTING_ROOT, 0, 1, "4e923f6e721a42f30b85c20fb9946cb55d138dc1d7009d248f7e66e668e2d810"),
        vector("receive_19", COUNTING_ROOT, 0, 19, "122c64bd876462388e3528df73b71254c72b465b4f317508fb4382d6dfff6db3"),
        vector("pay_0", COUNTING_ROOT, 1, 0, "d5f1cfc632ac6545bd3bdde110d3a1b849021a19f611fb9bc3b179ba2e2e99a9"),
        vector("pay_1", COUNTING_ROOT, 1, 1, "23885367fef1e64fc74839f3321e74d141627290858becd96708bcc763b7572e"),
        vector("change_0", COUNTING_ROOT, 2, 0, "d01a7d6312f9da4967c3c090ef42e43170421effc2014103c1f742128dbe8e30"),
        vector("mining_0", COUNTING_ROOT, 3, 0, "fa0241d21fb214760d78cc3e396ecd9b8b363ec36dbab5962fdbd491078cf8ad"),
        vector("mining_1", COUNTING_ROOT, 3, 1, "8cb8b80a4844637242425041260e4df682bfe954d5c898af380094d6444a4fc6"),
        vector("zero_root", [0u8; 32], 0, 0, "0f6a1356f6e00a4f61ce20c1b3dd6218f3aa5fae5b5c220ae930b776fb9ce68e"),
    ]
}

/// Secret-to-public vectors.
pub fn public_vectors() -> Vec<PublicVector> {
    vec![
        PublicVector {
            secret: "e1:secret:abc",
            public: "e1:public:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        PublicVector {
            secret: "e0.00000001:secret:hunter2",
            public: "e0.00000001:public:f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7",
        },
        PublicVector {
            secret: "e12.345678:secret:a:b:c",
            public: "e12.345678:public:b0ee04f880c4ff4261479e2e7822b7410aee4c7159f4185ad5b0d88a312b495e",
        },
        PublicVector {
            secret: "e12.345678:secret:ab1bee6329f999c713ae8b5122ee6c0d731917415cfb65f1277901cef20679d4",
            public: "e12.345678:public:41859e5dd145eb8794af85f369615bfb2f4f69ed866d459954e8ed9dfb47251d",
        },
    ]
}

/// Parse `text` and classify the result.
pub fn amount_outcome(text: &str) -> AmountOutcome {
    match Amount::parse_decimal(text) {
        Ok(parsed) => ok(parsed.value.raw(), parsed.noncanonical),
        Err(Error::Overflow) => AmountOutcome::Overflow,
        Err(_) => AmountOutcome::Invalid,
    }
}

/// Derive the serial a vector describes.
pub fn derive_vector(vector: &DerivationVector) -> String {
    let root = DerivationRoot::from_bytes(vector.root);
    match derive_one(&root, vector.chaincode, vector.depth) {
        Ok(serial) => serial.as_str().to_owned(),
        Err(e) => format!("<{e}>"),
    }
}

/// Compute the public hash text for a vector's claim code.
pub fn public_for(vector: &PublicVector) -> String {
    let public = Secret::parse(vector.secret)
        .map(|parsed| parsed.value)
        .and_then(|secret| PublicHash::from_secret(&secret));
    match public {
        Ok(public) => public.to_string(),
        Err(e) => format!("<{e}>"),
    }
}

/// Run every vector and report `(name, matches, actual)`.
///
/// Call this to verify your implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let amounts = amount_vectors().into_iter().map(|v| {
        let actual = amount_outcome(v.text);
        (format!("amount {:?}", v.text), actual == v.expected, format!("{actual:?}"))
    });
    let derivations = derivation_vectors().into_iter().map(|v| {
        let actual = derive_vector(&v);
        (v.name.to_string(), actual == v.serial, actual)
    });
    let publics = public_vectors().into_iter().map(|v| {
        let actual = public_for(&v);
        (v.secret.to_string(), actual == v.public, actual)
    });
    amounts.chain(derivations).chain(publics).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector {name} produced {actual}");
        }
    }

    #[test]
    fn test_counting_root() {
        assert_eq!(COUNTING_ROOT[0], 0);
        assert_eq!(COUNTING_ROOT[31], 31);
    }

    #[test]
    fn test_public_vectors_roundtrip() {
        for vector in public_vectors() {
            let parsed = PublicHash::parse(vector.public).unwrap();
            assert!(parsed.is_canonical());
            assert_eq!(parsed.value.to_string(), vector.public);
        }
    }
}
