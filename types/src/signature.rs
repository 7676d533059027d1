//! Transaction signature type and its format validator.
//!
//! Validation is purely syntactic and never touches the network: only
//! base58-alphabet characters, with a length in
//! [`TxSignature::MIN_LEN`, `TxSignature::MAX_LEN`]. Real ledger signatures
//! are 64 bytes (87 or 88 characters), but the accepted range is wider so
//! that short fixture signatures remain usable in development.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A syntactically valid transaction signature.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxSignature(String);

impl TxSignature {
    pub const MIN_LEN: usize = 32;
    pub const MAX_LEN: usize = 100;

    /// Validate and wrap a signature string.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len()) {
            return Err(TypesError::InvalidSignatureFormat);
        }
        if !raw.chars().all(is_base58_char) {
            return Err(TypesError::InvalidSignatureFormat);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `n` characters (or the whole signature if shorter).
    pub fn tail(&self, n: usize) -> &str {
        // base58 is pure ASCII, so byte slicing is on char boundaries
        &self.0[self.0.len().saturating_sub(n)..]
    }
}

/// Whether `c` belongs to the base58 alphabet (no `0`, `O`, `I`, `l`).
pub fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

impl FromStr for TxSignature {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TxSignature {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TxSignature> for String {
    fn from(sig: TxSignature) -> Self {
        sig.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxSignature({}..)", &self.0[..8.min(self.0.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REAL: &str =
        "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

    #[test]
    fn accepts_real_length_signature() {
        assert_eq!(REAL.len(), 88);
        assert!(TxSignature::parse(REAL).is_ok());
    }

    #[test]
    fn rejects_short_signature() {
        assert_eq!(
            TxSignature::parse("abc"),
            Err(TypesError::InvalidSignatureFormat)
        );
    }

    #[test]
    fn rejects_excluded_characters() {
        for bad in ['0', 'O', 'I', 'l', '-', ' '] {
            let mut s = "1".repeat(40);
            s.push(bad);
            assert!(TxSignature::parse(&s).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(TxSignature::parse(&"a".repeat(32)).is_ok());
        assert!(TxSignature::parse(&"a".repeat(100)).is_ok());
        assert!(TxSignature::parse(&"a".repeat(31)).is_err());
        assert!(TxSignature::parse(&"a".repeat(101)).is_err());
    }

    #[test]
    fn tail_returns_trailing_chars() {
        let sig = TxSignature::parse(REAL).unwrap();
        assert_eq!(sig.tail(4), "kQUW");
        assert_eq!(sig.tail(500), REAL);
    }
}
