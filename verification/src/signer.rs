use burnproof_types::Pubkey;

use crate::keys::AccountKeyList;
use crate::VerifyError;

/// The claimed wallet must be one of the transaction's required signers.
pub fn check_signer(keys: &AccountKeyList, wallet: &Pubkey) -> Result<(), VerifyError> {
    if keys.signers().contains(wallet) {
        Ok(())
    } else {
        Err(VerifyError::Unauthorized(*wallet))
    }
}
