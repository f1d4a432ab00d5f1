// Protocol constants shared by every node.
//
// Everything in this file is part of the binding protocol: changing a value
// changes which transactions are valid, so all nodes must agree bit-for-bit.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Name returned to contracts asking for the platform they run on
pub const PLATFORM_NAME: &[u8] = b"NEO";

// ===== STORAGE =====

// Maximum length of a storage key inside a contract namespace
pub const MAX_STORAGE_KEY_LEN: usize = 1024;

// ===== CONTRACTS =====

// 1 MiB maximum for a deployed script
pub const MAX_CONTRACT_SCRIPT_SIZE: usize = 1024 * 1024;
// Maximum number of declared parameters
pub const MAX_CONTRACT_PARAMETERS_NUM: usize = 252;
// Maximum length for name, version, author and email
pub const MAX_CONTRACT_STRING_LEN: usize = 252;
// Maximum length for the contract description
pub const MAX_CONTRACT_DESCRIPTION_LEN: usize = 65536;

// ===== ASSETS =====

// Maximum length of an asset name
pub const MAX_ASSET_NAME_LEN: usize = 1024;
// Maximum precision an asset can declare
pub const MAX_ASSET_PRECISION: u8 = 8;
// Renewal unit: one "year" of asset lifetime expressed in blocks
pub const BLOCKS_PER_YEAR: u32 = 2_000_000;
// Lifetime of assets created by contracts (register transactions differ)
pub const DEFAULT_ASSET_LIFETIME: u32 = 1 + BLOCKS_PER_YEAR;

// ===== AMOUNTS =====

// 8 decimals numbers
pub const FIXED8_DECIMALS: u8 = 8;
// 100 000 000 to represent one full unit
pub const FIXED8_ONE: i64 = 10i64.pow(FIXED8_DECIMALS as u32);

// ===== INTERPRETER =====

// Maximum number of elements an array result pushed to the stack may hold
pub const MAX_ARRAY_SIZE: usize = 1024;
// Integers wider than this are not accepted as block indexes
pub const MAX_BLOCK_INDEX_BYTES: usize = 5;
