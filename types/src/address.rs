//! Ledger public key type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A 32-byte ledger public key, rendered as base58.
///
/// Equality is byte equality: two textual encodings that decode to the same
/// key compare equal, and a string that does not decode never matches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    /// Length of a public key in bytes.
    pub const LEN: usize = 32;

    pub const fn new_from_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a base58 string, rejecting anything that is not exactly 32 bytes.
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))?;
        let array: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidAddress(format!("{s}: decoded to {} bytes", v.len()))
        })?;
        Ok(Self(array))
    }
}

impl FromStr for Pubkey {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TOKEN_PROGRAM_ID;

    #[test]
    fn parses_token_program_id() {
        let parsed = Pubkey::parse("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap();
        assert_eq!(parsed, TOKEN_PROGRAM_ID);
        assert_eq!(
            parsed.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn system_program_is_all_zero() {
        let system = Pubkey::parse("11111111111111111111111111111111").unwrap();
        assert_eq!(system.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Pubkey::parse("abc"),
            Err(TypesError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rejects_non_base58() {
        assert!(Pubkey::parse("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl").is_err());
    }

    #[test]
    fn serde_uses_base58_string() {
        let key = Pubkey::new_from_array([7u8; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{key}\""));
        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
