//! Proptest generators for property-based testing.

use proptest::prelude::*;

use webcash_core::{Amount, ChainCode, DerivationRoot, Secret};

/// Any representable amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    any::<i64>().prop_map(Amount::from_raw)
}

/// A strictly positive amount, the only kind a valid secret can carry.
pub fn positive_amount() -> impl Strategy<Value = Amount> {
    (1i64..=i64::MAX).prop_map(Amount::from_raw)
}

/// Decimal text in canonical form, paired with its raw value.
pub fn canonical_decimal() -> impl Strategy<Value = (String, i64)> {
    amount().prop_map(|a| (a.to_string(), a.raw()))
}

/// Decimal text in a non-canonical spelling of the same value.
pub fn noncanonical_decimal() -> impl Strategy<Value = (String, i64)> {
    (amount(), 0usize..3).prop_map(|(a, style)| {
        let text = a.to_string();
        let spelled = match style {
            0 if text.contains('.') => format!("{text}0"),
            0 | 1 if !text.contains('.') => format!("{text}."),
            1 => format!("{text}00"),
            _ => match text.strip_prefix('-') {
                Some(rest) => format!("-0{rest}"),
                None => format!("0{text}"),
            },
        };
        (spelled, a.raw())
    })
}

/// A random derivation root.
pub fn root() -> impl Strategy<Value = DerivationRoot> {
    any::<[u8; 32]>().prop_map(DerivationRoot::from_bytes)
}

/// A chain code, biased towards the conventional ones.
pub fn chain_code() -> impl Strategy<Value = ChainCode> {
    prop_oneof![
        Just(ChainCode::Receive),
        Just(ChainCode::Pay),
        Just(ChainCode::Change),
        Just(ChainCode::Mining),
        any::<u64>().prop_map(ChainCode::from),
    ]
}

/// A printable serial with no NUL bytes; may contain colons.
pub fn serial() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{1,80}".prop_map(String::from),
        any::<[u8; 32]>().prop_map(hex::encode),
    ]
}

/// A valid secret.
pub fn secret() -> impl Strategy<Value = Secret> {
    (positive_amount(), serial()).prop_map(|(amount, serial)| Secret::from_text(amount, &serial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use webcash_core::PublicHash;

    proptest! {
        #[test]
        fn test_canonical_text_parses_canonical((text, raw) in canonical_decimal()) {
            let parsed = Amount::parse_decimal(&text).unwrap();
            prop_assert!(parsed.is_canonical());
            prop_assert_eq!(parsed.value.raw(), raw);
        }

        #[test]
        fn test_noncanonical_text_is_flagged((text, raw) in noncanonical_decimal()) {
            let parsed = Amount::parse_decimal(&text).unwrap();
            prop_assert!(parsed.noncanonical, "{} not flagged", text);
            prop_assert_eq!(parsed.value.raw(), raw);
        }

        #[test]
        fn test_claim_code_roundtrip(secret in secret()) {
            let code = secret.to_claim_code().unwrap();
            let parsed = Secret::parse(&code).unwrap();
            prop_assert!(parsed.is_canonical());
            prop_assert_eq!(&parsed.value, &secret);
        }

        #[test]
        fn test_public_hash_roundtrip(secret in secret()) {
            let public = PublicHash::from_secret(&secret).unwrap();
            let parsed = PublicHash::parse(&public.to_string()).unwrap();
            prop_assert!(parsed.is_canonical());
            prop_assert_eq!(parsed.value, public);
        }
    }
}
