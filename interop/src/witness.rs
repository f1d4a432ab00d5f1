use ledger_common::{
    contract::create_signature_redeem_script,
    crypto::{hash160, PublicKey, Uint160},
};
use log::trace;

use crate::{context::InteropContext, error::InteropError, vm::Engine};

impl<'a> InteropContext<'a> {
    /// Whether `hash` is among the script hashes the current container must
    /// be witnessed by
    ///
    /// Without a container nothing is witnessed and the answer is `false`.
    pub fn check_hashed_witness(&self, hash: &Uint160) -> Result<bool, InteropError> {
        let Some(container) = self.container() else {
            return Ok(false);
        };
        let hashes = self.ledger().get_script_hashes_for_verifying(container)?;
        Ok(hashes.contains(hash))
    }

    // Same check for the standard signature script of `key`
    pub fn check_keyed_witness(&self, key: &PublicKey) -> Result<bool, InteropError> {
        let script = create_signature_redeem_script(key);
        self.check_hashed_witness(&hash160(&script))
    }
}

// The parameter is either a script hash or an encoded public key, a hash is
// tried first
pub(crate) fn runtime_check_witness(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let stack = engine.evaluation_stack_mut();
    let hash_or_key = stack.pop_bytes()?;

    let result = match Uint160::decode_bytes(&hash_or_key) {
        Ok(hash) => ctx.check_hashed_witness(&hash)?,
        Err(_) => {
            let key = PublicKey::from_bytes(&hash_or_key).map_err(|_| InteropError::InvalidWitnessParameter)?;
            ctx.check_keyed_witness(&key)?
        }
    };
    trace!("witness check for {}: {}", hex::encode(&hash_or_key), result);
    stack.push(result);
    Ok(())
}
