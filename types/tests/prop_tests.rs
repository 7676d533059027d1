use proptest::prelude::*;

use burnproof_types::signature::is_base58_char;
use burnproof_types::{Pubkey, TokenAmount, TxSignature};

const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

proptest! {
    /// Any base58 string within the length bounds is accepted.
    #[test]
    fn base58_in_range_is_accepted(s in "[1-9A-HJ-NP-Za-km-z]{32,100}") {
        prop_assert!(TxSignature::parse(&s).is_ok());
    }

    /// Anything shorter than the minimum is rejected.
    #[test]
    fn short_signatures_are_rejected(s in "[1-9A-HJ-NP-Za-km-z]{0,31}") {
        prop_assert!(TxSignature::parse(&s).is_err());
    }

    /// A single disallowed character anywhere poisons the whole signature.
    #[test]
    fn one_bad_char_is_rejected(
        s in "[1-9A-HJ-NP-Za-km-z]{40,80}",
        pos in 0usize..40,
        bad in prop::sample::select(vec!['0', 'O', 'I', 'l', '+', '/', '=', '_']),
    ) {
        let mut chars: Vec<char> = s.chars().collect();
        chars[pos] = bad;
        let s: String = chars.into_iter().collect();
        prop_assert!(TxSignature::parse(&s).is_err());
    }

    /// The character predicate agrees with the alphabet table.
    #[test]
    fn base58_predicate_matches_alphabet(c in any::<char>()) {
        prop_assert_eq!(is_base58_char(c), BASE58.contains(c));
    }

    /// Pubkey display/parse roundtrip.
    #[test]
    fn pubkey_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let key = Pubkey::new_from_array(bytes);
        prop_assert_eq!(Pubkey::parse(&key.to_string()).unwrap(), key);
    }

    /// Display units never exceed the raw amount and lose less than one unit.
    #[test]
    fn display_units_truncate(raw in any::<u64>(), decimals in 0u8..=19) {
        let amount = TokenAmount::new(raw, decimals);
        let scale = 10u64.pow(u32::from(decimals));
        let units = amount.display_units();
        prop_assert!(units <= raw);
        prop_assert!(raw - units * scale < scale);
    }
}
