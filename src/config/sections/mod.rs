//! Per-section settings.

pub mod store;
pub mod transfer;

pub use store::StoreConfig;
pub use transfer::TransferConfig;
