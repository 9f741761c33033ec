//! Blockchain client adapters

pub mod stub;

pub use stub::StubChainClient;
