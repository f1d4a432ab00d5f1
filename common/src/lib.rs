#![allow(clippy::module_inception)]

pub mod account;
pub mod asset;
pub mod block;
pub mod config;
pub mod contract;
pub mod crypto;
pub mod error;
pub mod fixed8;
pub mod serializer;
pub mod storage;
pub mod transaction;
pub mod trigger;
