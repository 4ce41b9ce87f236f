/**
 * Vesting Instructions
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    state::{Grant, Sale},
    SaleError,
    VestedClaimed,
    GRANT_SEED,
    SALE_SEED,
};

use super::vault::transfer_from_vault;

// =============================================================================
// CLAIM VESTED
// =============================================================================

#[derive(Accounts)]
pub struct ClaimVested<'info> {
    pub beneficiary: Signer<'info>,

    pub mint: Account<'info, Mint>,

    #[account(
        seeds = [SALE_SEED, mint.key().as_ref()],
        bump = sale.bump,
        has_one = mint,
        has_one = vault,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [GRANT_SEED, sale.key().as_ref(), beneficiary.key().as_ref()],
        bump = grant.bump,
        has_one = beneficiary @ SaleError::Unauthorized,
    )]
    pub grant: Account<'info, Grant>,

    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = beneficiary_token_account.owner == beneficiary.key() @ SaleError::InvalidTokenAccount,
        constraint = beneficiary_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub beneficiary_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn claim_vested_handler(ctx: Context<ClaimVested>) -> Result<u64> {
    let sale = &ctx.accounts.sale;
    let clock = Clock::get()?;

    sale.ensure_finalized()?;

    // Grant is updated before the transfer
    let grant = &mut ctx.accounts.grant;
    let amount = grant.claim(sale.finalized_at, clock.unix_timestamp)?;

    if amount == 0 {
        msg!("No new tranche: {} of 24 months already claimed", grant.months_claimed);
        return Ok(0);
    }

    let mint_key = ctx.accounts.mint.key();
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, mint_key.as_ref(), &[sale.bump]]];

    transfer_from_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.vault,
        sale.to_account_info(),
        ctx.accounts.beneficiary_token_account.to_account_info(),
        signer_seeds,
        amount,
    )?;

    emit!(VestedClaimed {
        sale: sale.key(),
        beneficiary: grant.beneficiary,
        amount,
        months_claimed: grant.months_claimed,
        total_claimed: grant.total_claimed,
    });

    Ok(amount)
}

// =============================================================================
// CLAIMABLE VESTED (view)
// =============================================================================

#[derive(Accounts)]
pub struct GetClaimableVested<'info> {
    #[account(
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        seeds = [GRANT_SEED, sale.key().as_ref(), grant.beneficiary.as_ref()],
        bump = grant.bump,
    )]
    pub grant: Account<'info, Grant>,
}

pub fn claimable_vested_handler(ctx: Context<GetClaimableVested>) -> Result<u64> {
    let sale = &ctx.accounts.sale;
    let grant = &ctx.accounts.grant;

    let clock = Clock::get()?;
    let (months, amount) = sale.claimable_vested(grant, clock.unix_timestamp);

    msg!(
        "Grant {}: {} claimable, {} of 24 months, {} of {} released",
        grant.beneficiary,
        amount,
        months,
        grant.total_claimed,
        grant.total_granted
    );

    Ok(amount)
}
