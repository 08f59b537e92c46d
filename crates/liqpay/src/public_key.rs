//! Merchant and balance keys.
//!
//! A key is a 128-bit UUID whose canonical text form is the unpadded standard
//! base64 encoding of its 16 raw bytes (always 22 characters). The same form is
//! used in request payloads, response bodies and anywhere a key is embedded in
//! JSON. In SQLite the key is stored as hyphenated UUID text.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LiqPayError;

/// Length of the canonical text form.
pub const ENCODED_LEN: usize = 22;

/// Encode 16 raw key bytes into the canonical 22-char text form.
pub fn encode(raw: &[u8; 16]) -> String {
    STANDARD_NO_PAD.encode(raw)
}

/// Decode canonical key text. Surrounding whitespace and `"` are ignored so a
/// quoted JSON literal can be passed as-is.
pub fn decode(text: &str) -> Result<[u8; 16], LiqPayError> {
    let trimmed = text.trim_matches(|c: char| c == '"' || c.is_whitespace());
    let bytes = STANDARD_NO_PAD
        .decode(trimmed)
        .map_err(|e| LiqPayError::MalformedKey(format!("invalid base64: {e}")))?;
    <[u8; 16]>::try_from(bytes.as_slice()).map_err(|_| {
        LiqPayError::MalformedKey(format!("expected 16 bytes, got {}", bytes.len()))
    })
}

/// A merchant public key or balance key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(Uuid);

impl PublicKey {
    pub fn from_bytes(raw: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(raw))
    }

    pub fn id(&self) -> Uuid {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for PublicKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<PublicKey> for Uuid {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.as_bytes()))
    }
}

impl FromStr for PublicKey {
    type Err = LiqPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self::from_bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "full")]
mod sql {
    use super::PublicKey;
    use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
    use uuid::Uuid;

    impl ToSql for PublicKey {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(ToSqlOutput::from(self.0.hyphenated().to_string()))
        }
    }

    impl FromSql for PublicKey {
        fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
            match value {
                ValueRef::Text(text) => {
                    let text =
                        std::str::from_utf8(text).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                    Uuid::parse_str(text)
                        .map(PublicKey)
                        .map_err(|e| FromSqlError::Other(Box::new(e)))
                }
                ValueRef::Blob(blob) => <[u8; 16]>::try_from(blob)
                    .map(PublicKey::from_bytes)
                    .map_err(|_| FromSqlError::InvalidBlobSize {
                        expected_size: 16,
                        blob_size: blob.len(),
                    }),
                _ => Err(FromSqlError::InvalidType),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];

    #[test]
    fn test_encode_is_22_chars_without_padding() {
        let text = encode(&SAMPLE);
        assert_eq!(text, "AAECAwQFBgcICQoLDA0ODw");
        assert_eq!(text.len(), ENCODED_LEN);
        assert!(!text.contains('='));
    }

    #[test]
    fn test_decode_tolerates_quotes_and_whitespace() {
        assert_eq!(decode("\"AAECAwQFBgcICQoLDA0ODw\"").unwrap(), SAMPLE);
        assert_eq!(decode("  AAECAwQFBgcICQoLDA0ODw \n").unwrap(), SAMPLE);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let short = STANDARD_NO_PAD.encode([7u8; 15]);
        let long = STANDARD_NO_PAD.encode([7u8; 17]);
        assert!(matches!(decode(&short), Err(LiqPayError::MalformedKey(_))));
        assert!(matches!(decode(&long), Err(LiqPayError::MalformedKey(_))));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode("not a key at all!!!!!!"),
            Err(LiqPayError::MalformedKey(_))
        ));
        assert!(matches!(decode(""), Err(LiqPayError::MalformedKey(_))));
        // Padded input is not the canonical form.
        assert!(matches!(
            decode("AAECAwQFBgcICQoLDA0ODw=="),
            Err(LiqPayError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_uses_canonical_text() {
        let key = PublicKey::from_bytes(SAMPLE);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"AAECAwQFBgcICQoLDA0ODw\"");
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_json_rejects_malformed_key() {
        let result: Result<PublicKey, _> = serde_json::from_str("\"AAECAw\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_uuid_conversion() {
        let key = PublicKey::from_bytes(SAMPLE);
        assert_eq!(
            key.id().hyphenated().to_string(),
            "00010203-0405-0607-0809-0a0b0c0d0e0f"
        );
        assert_eq!(PublicKey::from(key.id()), key);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(raw in any::<[u8; 16]>()) {
            prop_assert_eq!(decode(&encode(&raw)).unwrap(), raw);
        }

        #[test]
        fn canonical_text_is_stable(raw in any::<[u8; 16]>()) {
            let text = encode(&raw);
            prop_assert_eq!(text.len(), ENCODED_LEN);
            prop_assert_eq!(encode(&decode(&text).unwrap()), text);
        }

        #[test]
        fn other_lengths_are_rejected(raw in proptest::collection::vec(any::<u8>(), 0..40)) {
            prop_assume!(raw.len() != 16);
            let text = STANDARD_NO_PAD.encode(&raw);
            prop_assert!(decode(&text).is_err());
        }
    }
}
