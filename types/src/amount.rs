//! Token amounts.
//!
//! Amounts are carried as raw base units (u64, as the token program stores
//! them) together with the mint's decimals. Display units are obtained by
//! integer division by `10^decimals`, truncating any fractional remainder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest decimals value for which `10^decimals` fits in a `u64`.
pub const MAX_DECIMALS: u8 = 19;

/// A raw token amount tagged with the mint's decimals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    raw: u64,
    decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Whole display units, truncated. Returns 0 if `decimals` is out of range.
    pub fn display_units(&self) -> u64 {
        unit_scale(self.decimals)
            .map(|scale| self.raw / scale)
            .unwrap_or(0)
    }

    /// Sum of two amounts of the same mint. `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        debug_assert_eq!(self.decimals, other.decimals);
        self.raw.checked_add(other.raw).map(|raw| Self {
            raw,
            decimals: self.decimals,
        })
    }
}

/// `10^decimals`, or `None` when it does not fit in a `u64`.
pub fn unit_scale(decimals: u8) -> Option<u64> {
    10u64.checked_pow(u32::from(decimals))
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match unit_scale(self.decimals) {
            Some(scale) if self.decimals > 0 => write!(
                f,
                "{}.{:0width$}",
                self.raw / scale,
                self.raw % scale,
                width = self.decimals as usize
            ),
            _ => write!(f, "{}", self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_units_truncate() {
        assert_eq!(TokenAmount::new(500_000_000_000, 9).display_units(), 500);
        assert_eq!(TokenAmount::new(1_999_999, 6).display_units(), 1);
        assert_eq!(TokenAmount::new(999_999, 6).display_units(), 0);
        assert_eq!(TokenAmount::new(42, 0).display_units(), 42);
    }

    #[test]
    fn out_of_range_decimals_yield_zero() {
        assert_eq!(TokenAmount::new(u64::MAX, 20).display_units(), 0);
        assert!(unit_scale(MAX_DECIMALS).is_some());
        assert!(unit_scale(MAX_DECIMALS + 1).is_none());
    }

    #[test]
    fn display_formats_fraction() {
        assert_eq!(TokenAmount::new(1_500_000, 6).to_string(), "1.500000");
        assert_eq!(TokenAmount::new(7, 0).to_string(), "7");
    }

    #[test]
    fn checked_add_overflows_to_none() {
        let a = TokenAmount::new(u64::MAX, 6);
        assert!(a.checked_add(TokenAmount::new(1, 6)).is_none());
    }
}
