/**
 * State Accounts for Capped Sale
 * 
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

pub mod sale;
pub mod contribution;
pub mod allocation;
pub mod vesting;

pub use sale::*;
pub use contribution::*;
pub use allocation::*;
pub use vesting::*;
