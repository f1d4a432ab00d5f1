use super::BlockHeader;
use crate::{
    crypto::{Hashable, Uint256},
    transaction::Transaction,
};
use std::{
    fmt::Error,
    fmt::{Display, Formatter},
    ops::Deref,
    sync::Arc,
};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    header: Arc<BlockHeader>,
    transactions: Vec<Arc<Transaction>>,
}

impl Block {
    pub fn new(header: BlockHeader, transactions: Vec<Arc<Transaction>>) -> Self {
        Block {
            header: Arc::new(header),
            transactions,
        }
    }

    pub fn get_header(&self) -> &Arc<BlockHeader> {
        &self.header
    }

    pub fn get_txs_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn get_transactions(&self) -> &Vec<Arc<Transaction>> {
        &self.transactions
    }

    // A block is identified by the hash of its header
    pub fn hash(&self) -> Uint256 {
        self.header.hash()
    }
}

impl Deref for Block {
    type Target = BlockHeader;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "Block[index: {}, hash: {}, txs: {}]",
            self.index,
            self.hash(),
            self.transactions.len()
        )
    }
}
