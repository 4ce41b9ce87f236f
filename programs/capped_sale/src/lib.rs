/**
 * Capped Sale
 *
 * Time-boxed token sale with a soft-cap window rule, a one-shot supply
 * allocation at finalize and monthly vesting for team pool and foundation.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 *
 * License: BSL 1.1 (converts to MIT after Dec 2028)
 */

use anchor_lang::prelude::*;

pub mod state;
pub mod instructions;

use state::*;
use instructions::*;

declare_id!("GVCHhjG75oNmhVtDfea8EZXJ62p3mxuunE5htd7h7hTx");

// =============================================================================
// SEEDS
// =============================================================================

pub const SALE_SEED: &[u8] = b"sale";
pub const VAULT_SEED: &[u8] = b"sale_vault";
pub const CONTRIBUTION_SEED: &[u8] = b"contribution";
pub const GRANT_SEED: &[u8] = b"grant";

// =============================================================================
// CONSTANTS
// =============================================================================

/// Share of the total supply sold to contributors (51%)
pub const SOLD_SUPPLY_PERCENT: u128 = 51;

/// Early investor share of the total supply (5%)
pub const EARLY_INVESTOR_PERCENT: u128 = 5;

/// Team share of the total supply, members + team pool (10%)
pub const TEAM_PERCENT: u128 = 10;

/// Foundation share of the total supply (15%)
pub const FOUNDATION_PERCENT: u128 = 15;

/// One vesting month: 30 days
pub const SECONDS_PER_MONTH: i64 = 30 * 24 * 60 * 60;

/// Cliff after finalize before any grant can be claimed: 6 months
pub const VESTING_CLIFF_SECONDS: i64 = 6 * SECONDS_PER_MONTH;

/// Number of monthly tranches in a grant
pub const VESTING_MONTHS: u64 = 24;

// =============================================================================
// PROGRAM
// =============================================================================

#[program]
pub mod capped_sale {
    use super::*;

    // =========================================================================
    // SETUP
    // =========================================================================

    /// Create the sale account and its token vault
    /// The mint authority must already be the sale PDA
    pub fn initialize_sale(
        ctx: Context<InitializeSale>,
        params: InitializeSaleParams,
    ) -> Result<()> {
        instructions::initialize_sale::initialize_handler(ctx, params)
    }

    // =========================================================================
    // FUNDING WINDOW
    // =========================================================================

    /// Contribute lamports to the sale
    /// Value goes straight to the settlement wallet
    pub fn contribute(ctx: Context<Contribute>, amount: u64) -> Result<()> {
        instructions::contribute::contribute_handler(ctx, amount)
    }

    /// Suspend contributions (authority only)
    pub fn pause_sale(ctx: Context<PauseSale>) -> Result<()> {
        instructions::pause::pause_handler(ctx)
    }

    /// Resume contributions (authority only)
    pub fn resume_sale(ctx: Context<ResumeSale>) -> Result<()> {
        instructions::pause::resume_handler(ctx)
    }

    // =========================================================================
    // FINALIZE
    // =========================================================================

    /// Close the sale, mint the full supply and distribute it
    /// Permissionless, succeeds exactly once
    pub fn finalize_sale(ctx: Context<FinalizeSale>) -> Result<()> {
        instructions::finalize::finalize_handler(ctx)
    }

    // =========================================================================
    // PAYOUTS
    // =========================================================================

    /// Pay a contributor their purchased tokens (authority only)
    /// Returns the amount transferred, 0 when already paid
    pub fn claim_purchase(ctx: Context<ClaimPurchase>) -> Result<u64> {
        instructions::claim_purchase::claim_purchase_handler(ctx)
    }

    /// Release the vested tranches of a grant to its beneficiary
    /// Returns the amount transferred, 0 when no new month has elapsed
    pub fn claim_vested(ctx: Context<ClaimVested>) -> Result<u64> {
        instructions::vesting::claim_vested_handler(ctx)
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Get sale status
    pub fn get_sale_status(ctx: Context<GetSaleStatus>) -> Result<SaleStatusView> {
        instructions::status::sale_status_handler(ctx)
    }

    /// Get a participant's recorded contribution
    pub fn get_contribution(ctx: Context<GetContribution>) -> Result<u64> {
        instructions::status::contribution_handler(ctx)
    }

    /// Preview what `claim_vested` would release right now
    pub fn get_claimable_vested(ctx: Context<GetClaimableVested>) -> Result<u64> {
        instructions::vesting::claimable_vested_handler(ctx)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[error_code]
pub enum SaleError {
    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Start time must be in the future")]
    InvalidStartTime,

    #[msg("Post-cap delays must satisfy 0 < min < max")]
    InvalidDelayWindow,

    #[msg("Sale duration must be positive")]
    InvalidDuration,

    #[msg("Token price multiplier must be positive")]
    InvalidPriceMultiplier,

    #[msg("Address must not be the zero key")]
    ZeroAddress,

    #[msg("Team pool and foundation must be distinct")]
    DuplicateBeneficiary,

    #[msg("Mint authority must be the sale account")]
    InvalidMintAuthority,

    #[msg("Mint supply must be zero")]
    MintSupplyNotZero,

    #[msg("Sale has not started")]
    SaleNotStarted,

    #[msg("Sale window has ended")]
    SaleEnded,

    #[msg("Sale window has not ended")]
    SaleNotEnded,

    #[msg("Sale is paused")]
    SalePaused,

    #[msg("Sale is not paused")]
    SaleNotPaused,

    #[msg("Contribution is below the minimum")]
    ContributionBelowMinimum,

    #[msg("Minimum raise not reached")]
    MinimumRaiseNotReached,

    #[msg("Already finalized")]
    AlreadyFinalized,

    #[msg("Sale not finalized")]
    NotFinalized,

    #[msg("Team share is below the fixed member allocations")]
    TeamShareBelowFixedAllocations,

    #[msg("Cliff period not yet passed")]
    CliffNotPassed,

    #[msg("Invalid settlement wallet")]
    InvalidSettlementWallet,

    #[msg("Token account does not belong to the expected owner or mint")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}

// =============================================================================
// EVENTS
// =============================================================================

#[event]
pub struct SaleInitialized {
    pub sale: Pubkey,
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub start_time: i64,
    pub max_end_time: i64,
    pub soft_cap: u64,
    pub min_to_raise: u64,
}

#[event]
pub struct ContributionRecorded {
    pub sale: Pubkey,
    pub participant: Pubkey,
    pub amount: u64,
    pub participant_total: u64,
    pub total_raised: u64,
}

#[event]
pub struct SaleEndTimeShortened {
    pub sale: Pubkey,
    pub previous_end_time: i64,
    pub new_end_time: i64,
    pub total_raised: u64,
}

#[event]
pub struct SaleSuspended {
    pub sale: Pubkey,
    pub paused_by: Pubkey,
}

#[event]
pub struct SaleResumed {
    pub sale: Pubkey,
    pub resumed_by: Pubkey,
}

#[event]
pub struct SaleFinalized {
    pub sale: Pubkey,
    pub total_raised: u64,
    pub total_supply: u64,
    pub sold_supply: u64,
    pub early_investor_share: u64,
    pub team_pool_grant: u64,
    pub foundation_share: u64,
    pub strategy_fund_share: u64,
    pub finalized_at: i64,
    pub finalized_by: Pubkey,
}

#[event]
pub struct PurchaseClaimed {
    pub sale: Pubkey,
    pub participant: Pubkey,
    pub contributed: u64,
    pub tokens: u64,
}

#[event]
pub struct VestedClaimed {
    pub sale: Pubkey,
    pub beneficiary: Pubkey,
    pub amount: u64,
    pub months_claimed: u64,
    pub total_claimed: u64,
}
