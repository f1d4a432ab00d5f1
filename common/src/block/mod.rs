mod block;
mod header;

pub use block::Block;
pub use header::BlockHeader;

// Height of a block in the chain, the genesis block is at index 0
pub type BlockIndex = u32;
