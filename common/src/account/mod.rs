use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    crypto::{PublicKey, Uint160, Uint256},
    fixed8::Fixed8,
};

/// State of an account identified by its script hash
///
/// Balances keep their insertion order so that iteration is deterministic
/// across nodes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountState {
    pub script_hash: Uint160,
    pub is_frozen: bool,
    pub votes: Vec<PublicKey>,
    pub balances: IndexMap<Uint256, Fixed8>,
}

impl AccountState {
    // Fresh account with no balance, returned for unknown script hashes
    pub fn new(script_hash: Uint160) -> Self {
        Self {
            script_hash,
            is_frozen: false,
            votes: Vec::new(),
            balances: IndexMap::new(),
        }
    }

    // Balance for an asset, zero when the account never held it
    pub fn get_balance(&self, asset: &Uint256) -> Fixed8 {
        self.balances.get(asset).copied().unwrap_or_default()
    }
}
