/**
 * Instructions for Capped Sale
 * 
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

pub mod initialize_sale;
pub mod contribute;
pub mod pause;
pub mod finalize;
pub mod claim_purchase;
pub mod vesting;
pub mod status;
mod vault;

pub use initialize_sale::*;
pub use contribute::*;
pub use pause::*;
pub use finalize::*;
pub use claim_purchase::*;
pub use vesting::*;
pub use status::*;
