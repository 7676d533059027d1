use burnproof_types::RejectReason;
use burnproof_verification::reconcile::reconcile;
use burnproof_verification::VerifyError;
use proptest::prelude::*;

proptest! {
    #[test]
    fn delta_within_one_percent_is_accepted(decoded in 100u64..u64::MAX / 2, permille in 0u64..=10) {
        let slack = decoded / 1000 * permille;
        prop_assert!(reconcile(decoded, decoded - slack).is_ok());
        prop_assert!(reconcile(decoded, decoded + slack).is_ok());
    }

    #[test]
    fn delta_beyond_one_percent_is_mismatch(decoded in 1u64..u64::MAX / 4, extra in 1u64..1_000_000) {
        let gap = decoded / 100 + extra;
        let err = reconcile(decoded, decoded + gap).unwrap_err();
        let is_amount_mismatch = matches!(err, VerifyError::AmountMismatch { .. });
        prop_assert!(is_amount_mismatch);
        prop_assert_eq!(err.reason(), RejectReason::AmountMismatch);
        if gap <= decoded {
            prop_assert!(reconcile(decoded, decoded - gap).is_err());
        }
    }

    #[test]
    fn reconcile_is_total(decoded: u64, delta: u64) {
        let _ = reconcile(decoded, delta);
    }
}
