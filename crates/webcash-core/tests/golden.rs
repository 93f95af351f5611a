//! Golden test vectors for webcash.
//!
//! These vectors pin the derivation, claim-code, public-hash and mining
//! formats. Any implementation must produce byte-identical output.

use serde::Serialize;
use webcash_core::{
    derive_secret, Amount, ChainCode, DerivationRoot, MiningJob, PublicHash, Secret, Sha256Hash,
    WALLET_TAG,
};

/// One derived secret carried through to its public hash.
#[derive(Debug, Serialize)]
struct GoldenVector {
    name: &'static str,
    root: String,
    chaincode: u64,
    depth: u64,
    amount: String,
    claim_code: String,
    public: String,
}

fn counting_root() -> DerivationRoot {
    let mut bytes = [0u8; 32];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = i as u8;
    }
    DerivationRoot::from_bytes(bytes)
}

fn generate_vector(
    name: &'static str,
    chaincode: ChainCode,
    depth: u64,
    amount: &str,
) -> GoldenVector {
    let root = counting_root();
    let amount: Amount = amount.parse().unwrap();
    let secret = derive_secret(&root, chaincode, depth, amount).unwrap();
    let public = PublicHash::from_secret(&secret).unwrap();
    GoldenVector {
        name,
        root: root.to_hex().to_string(),
        chaincode: chaincode.as_u64(),
        depth,
        amount: amount.to_string(),
        claim_code: secret.to_claim_code().unwrap().to_string(),
        public: public.to_string(),
    }
}

fn generate_all_vectors() -> Vec<GoldenVector> {
    vec![
        generate_vector("receive_0", ChainCode::Receive, 0, "12.345678"),
        generate_vector("pay_0", ChainCode::Pay, 0, "1"),
        generate_vector("change_0", ChainCode::Change, 0, "0.00000001"),
        generate_vector("mining_1", ChainCode::Mining, 1, "200000"),
        generate_vector("receive_7_last_partial_lane", ChainCode::Receive, 7, "3.5"),
        generate_vector("receive_8_next_group", ChainCode::Receive, 8, "3.5"),
        generate_vector("other_deep", ChainCode::Other(5), 1 << 40, "92233720368.54775807"),
    ]
}

#[test]
fn test_wallet_tag() {
    assert_eq!(WALLET_TAG, b"webcashwalletv1");
    assert_eq!(
        Sha256Hash::hash(WALLET_TAG).to_hex(),
        "8c45d02c5d92f1483d935e41f136db3561eac0baa5bbfe0708d38e2ce36a7687"
    );
}

#[test]
fn test_golden_pipeline() {
    let expected = [
        (
            "e12.345678:secret:ab1bee6329f999c713ae8b5122ee6c0d731917415cfb65f1277901cef20679d4",
            "e12.345678:public:41859e5dd145eb8794af85f369615bfb2f4f69ed866d459954e8ed9dfb47251d",
        ),
        (
            "e1:secret:d5f1cfc632ac6545bd3bdde110d3a1b849021a19f611fb9bc3b179ba2e2e99a9",
            "e1:public:309265b01542ee64745857a89a21118e734752a9e37ef6bf68fa421c9349af01",
        ),
        (
            "e0.00000001:secret:d01a7d6312f9da4967c3c090ef42e43170421effc2014103c1f742128dbe8e30",
            "e0.00000001:public:ae7f78121c57c1317a13f723991613f08cb0f105d53c8dd0a12b7f9c5d6b55ef",
        ),
        (
            "e200000:secret:8cb8b80a4844637242425041260e4df682bfe954d5c898af380094d6444a4fc6",
            "e200000:public:b006fe5a160e5228ec53c6237948332e4792df99b53a34556b97a91c13310325",
        ),
        (
            "e3.5:secret:f895b3b161e03e7d6e62b1092102ceccacbbf0a7f7313670167fa8daf8a2526b",
            "e3.5:public:9ce0a418189369a3b62f200244a42a1fcc2cf4a07b68c80bb89084d563b0891c",
        ),
        (
            "e3.5:secret:01942db27b5988901c521c2a7428da1c6647caf938bcd92846cdb50d9391643e",
            "e3.5:public:f521ff3a1bdc4cc7503301c1a35b2a1167bd62777495153fca2ce5ee96723177",
        ),
        (
            "e92233720368.54775807:secret:7b6b6fc85ae9ec486ad74bf37a76d12dbc235585e56598934d84aeafe3ca92c3",
            "e92233720368.54775807:public:17ae2bad61598a9dde56104062132f21b959ae47db467fca0e8e9c6f827ccc59",
        ),
    ];

    let vectors = generate_all_vectors();
    assert_eq!(vectors.len(), expected.len());
    for (v, (claim_code, public)) in vectors.iter().zip(expected) {
        assert_eq!(v.claim_code, claim_code, "claim code mismatch for {}", v.name);
        assert_eq!(v.public, public, "public hash mismatch for {}", v.name);
    }
}

#[test]
fn test_vectors_deterministic() {
    let v1 = generate_all_vectors();
    let v2 = generate_all_vectors();
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert_eq!(a.claim_code, b.claim_code, "claim code mismatch for {}", a.name);
        assert_eq!(a.public, b.public, "public mismatch for {}", a.name);
    }
}

#[test]
fn test_vectors_parse_back() {
    for v in generate_all_vectors() {
        let secret = Secret::parse(&v.claim_code).unwrap();
        assert!(secret.is_canonical(), "{}", v.name);
        let public = PublicHash::parse(&v.public).unwrap();
        assert!(public.is_canonical(), "{}", v.name);
        assert_eq!(secret.value.to_public().unwrap(), public.value, "{}", v.name);
        assert_eq!(public.value.amount.to_string(), v.amount);
    }
}

#[test]
fn test_mining_preimage() {
    let job = MiningJob::new("{\"difficulty\": 8, \"nonce\": ").unwrap();
    assert_eq!(
        job.prefix(),
        "eyJkaWZmaWN1bHR5IjogOCwgIm5vbmNlIjogICAgICAgICAgICAgICAgICAgICAg"
    );

    let first = job.search_group(0, 123).unwrap().unwrap();
    assert_eq!(first.nonce, 123_000);
    assert_eq!(
        first.preimage,
        "eyJkaWZmaWN1bHR5IjogOCwgIm5vbmNlIjogICAgICAgICAgICAgICAgICAgICAgMTIzMDAwfQ=="
    );
    assert_eq!(
        first.hash.to_hex(),
        "548e20137a492c003fdd05ad449c816557ab9498e98bbb4e50557902aeda825f"
    );

    let solution = job.search(8).unwrap();
    assert_eq!(solution.nonce, 100_004);
    assert_eq!(
        solution.hash.to_hex(),
        "00f3354514836e81979d70df2aaee87edc60ecfa6ec87c21b864c7b4e4a73835"
    );
}

#[test]
fn print_golden_vectors_json() {
    #[derive(Serialize)]
    struct VectorFile {
        description: String,
        wallet_tag: String,
        vectors: Vec<GoldenVector>,
    }

    let file = VectorFile {
        description: "Golden test vectors for webcash. Every implementation must produce identical outputs.".to_string(),
        wallet_tag: String::from_utf8_lossy(WALLET_TAG).to_string(),
        vectors: generate_all_vectors(),
    };

    let json = serde_json::to_string_pretty(&file).unwrap();
    println!("{}", json);
}
