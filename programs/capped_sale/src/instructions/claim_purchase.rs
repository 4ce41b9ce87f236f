/**
 * Claim Purchase Instruction
 *
 * Authority-gated payout of a contributor's tokens after finalize.
 * Safe to retry: a paid record yields a zero transfer.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    state::{Contribution, Sale},
    PurchaseClaimed,
    SaleError,
    CONTRIBUTION_SEED,
    SALE_SEED,
};

use super::vault::transfer_from_vault;

#[derive(Accounts)]
pub struct ClaimPurchase<'info> {
    pub authority: Signer<'info>,

    pub mint: Account<'info, Mint>,

    #[account(
        seeds = [SALE_SEED, mint.key().as_ref()],
        bump = sale.bump,
        has_one = authority @ SaleError::Unauthorized,
        has_one = mint,
        has_one = vault,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [CONTRIBUTION_SEED, sale.key().as_ref(), contribution.participant.as_ref()],
        bump = contribution.bump,
    )]
    pub contribution: Account<'info, Contribution>,

    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = participant_token_account.owner == contribution.participant @ SaleError::InvalidTokenAccount,
        constraint = participant_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn claim_purchase_handler(ctx: Context<ClaimPurchase>) -> Result<u64> {
    let sale = &ctx.accounts.sale;
    sale.ensure_finalized()?;

    // Zero the record before moving tokens
    let contribution = &mut ctx.accounts.contribution;
    let contributed = contribution.amount;
    let tokens = contribution.take_payout(sale.token_price_multiplier)?;

    if tokens == 0 {
        msg!("Nothing owed to {}", contribution.participant);
        return Ok(0);
    }

    let mint_key = ctx.accounts.mint.key();
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, mint_key.as_ref(), &[sale.bump]]];

    transfer_from_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.mint,
        &ctx.accounts.vault,
        sale.to_account_info(),
        ctx.accounts.participant_token_account.to_account_info(),
        signer_seeds,
        tokens,
    )?;

    emit!(PurchaseClaimed {
        sale: sale.key(),
        participant: contribution.participant,
        contributed,
        tokens,
    });

    Ok(tokens)
}
