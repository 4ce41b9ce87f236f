/**
 * Initialize Sale Instruction
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    state::{InitializeSaleParams, Sale},
    SaleError,
    SaleInitialized,
    SALE_SEED,
    VAULT_SEED,
};

#[derive(Accounts)]
pub struct InitializeSale<'info> {
    /// Funds the accounts; the controlling authority comes from the params
    #[account(mut)]
    pub payer: Signer<'info>,

    pub mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        space = Sale::LEN,
        seeds = [SALE_SEED, mint.key().as_ref()],
        bump,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        init,
        payer = payer,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = sale,
    )]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: Settlement wallet, only ever receives lamports
    pub settlement_wallet: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn initialize_handler(ctx: Context<InitializeSale>, params: InitializeSaleParams) -> Result<()> {
    let clock = Clock::get()?;
    params.validate(clock.unix_timestamp)?;

    let sale_key = ctx.accounts.sale.key();
    let mint = &ctx.accounts.mint;

    // The sale must be able to mint the full supply at finalize
    require!(
        Option::<Pubkey>::from(mint.mint_authority) == Some(sale_key),
        SaleError::InvalidMintAuthority
    );
    require!(mint.supply == 0, SaleError::MintSupplyNotZero);
    require!(
        ctx.accounts.settlement_wallet.key() != Pubkey::default(),
        SaleError::ZeroAddress
    );

    let sale = &mut ctx.accounts.sale;
    sale.configure(&params)?;
    sale.mint = mint.key();
    sale.vault = ctx.accounts.vault.key();
    sale.settlement_wallet = ctx.accounts.settlement_wallet.key();
    sale.bump = ctx.bumps.sale;
    sale.vault_bump = ctx.bumps.vault;

    msg!(
        "Sale opens at {}, closes by {} (soft cap {} lamports)",
        sale.start_time,
        sale.max_end_time,
        sale.soft_cap
    );

    emit!(SaleInitialized {
        sale: sale_key,
        mint: sale.mint,
        authority: sale.authority,
        start_time: sale.start_time,
        max_end_time: sale.max_end_time,
        soft_cap: sale.soft_cap,
        min_to_raise: sale.min_to_raise,
    });

    Ok(())
}
