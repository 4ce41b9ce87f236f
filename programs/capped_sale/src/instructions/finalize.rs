/**
 * Finalize Sale Instruction
 *
 * One-shot: checks, computes the allocation, commits the terminal state and
 * the grants, then mints and distributes. Any failing CPI aborts the whole
 * transaction, so no partial mint is ever observable.
 *
 * DISTRIBUTION:
 *   vault          sold supply + team pool grant + foundation grant
 *   investor       early investor share
 *   member one/two fixed allocations
 *   strategy fund  remainder
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{
    mint_to, set_authority, spl_token::instruction::AuthorityType, Mint, MintTo, SetAuthority,
    Token, TokenAccount,
};

use crate::{
    state::{Grant, Sale},
    SaleError,
    SaleFinalized,
    GRANT_SEED,
    SALE_SEED,
};

use super::vault::transfer_from_vault;

#[derive(Accounts)]
pub struct FinalizeSale<'info> {
    /// Anyone can finalize once the window is closed
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut)]
    pub mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        seeds = [SALE_SEED, mint.key().as_ref()],
        bump = sale.bump,
        has_one = mint,
        has_one = vault,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(mut)]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = investor_token_account.owner == sale.beneficiaries.investor @ SaleError::InvalidTokenAccount,
        constraint = investor_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub investor_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = member_one_token_account.owner == sale.beneficiaries.member_one @ SaleError::InvalidTokenAccount,
        constraint = member_one_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub member_one_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = member_two_token_account.owner == sale.beneficiaries.member_two @ SaleError::InvalidTokenAccount,
        constraint = member_two_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub member_two_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = strategy_fund_token_account.owner == sale.beneficiaries.strategy_fund @ SaleError::InvalidTokenAccount,
        constraint = strategy_fund_token_account.mint == mint.key() @ SaleError::InvalidTokenAccount,
    )]
    pub strategy_fund_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = payer,
        space = Grant::LEN,
        seeds = [GRANT_SEED, sale.key().as_ref(), sale.beneficiaries.team_pool.as_ref()],
        bump,
    )]
    pub team_pool_grant: Box<Account<'info, Grant>>,

    #[account(
        init,
        payer = payer,
        space = Grant::LEN,
        seeds = [GRANT_SEED, sale.key().as_ref(), sale.beneficiaries.foundation.as_ref()],
        bump,
    )]
    pub foundation_grant: Box<Account<'info, Grant>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn finalize_handler(ctx: Context<FinalizeSale>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;

    // Checks: fails here with nothing written, including the team underflow
    let allocation = ctx.accounts.sale.prepare_finalize(now)?;

    // Effects
    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    sale.mark_finalized(&allocation, now);
    let beneficiaries = sale.beneficiaries;
    let authority = sale.authority;
    let bump = sale.bump;

    ctx.accounts.team_pool_grant.open(
        sale_key,
        beneficiaries.team_pool,
        allocation.team_pool_grant,
        ctx.bumps.team_pool_grant,
    );
    ctx.accounts.foundation_grant.open(
        sale_key,
        beneficiaries.foundation,
        allocation.foundation_share,
        ctx.bumps.foundation_grant,
    );

    // Interactions
    let mint_key = ctx.accounts.mint.key();
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, mint_key.as_ref(), &[bump]]];
    let token_program = &ctx.accounts.token_program;
    let sale_info = ctx.accounts.sale.to_account_info();

    mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: sale_info.clone(),
            },
            signer_seeds,
        ),
        allocation.total_supply,
    )?;

    let payouts = [
        (ctx.accounts.investor_token_account.to_account_info(), allocation.early_investor_share),
        (ctx.accounts.member_one_token_account.to_account_info(), allocation.member_one_allocation),
        (ctx.accounts.member_two_token_account.to_account_info(), allocation.member_two_allocation),
        (ctx.accounts.strategy_fund_token_account.to_account_info(), allocation.strategy_fund_share),
    ];
    for (destination, amount) in payouts {
        transfer_from_vault(
            token_program,
            &ctx.accounts.mint,
            &ctx.accounts.vault,
            sale_info.clone(),
            destination,
            signer_seeds,
            amount,
        )?;
    }

    // Hand the mint over to the authority
    set_authority(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            SetAuthority {
                current_authority: sale_info,
                account_or_mint: ctx.accounts.mint.to_account_info(),
            },
            signer_seeds,
        ),
        AuthorityType::MintTokens,
        Some(authority),
    )?;

    msg!(
        "Sale finalized: {} lamports raised, {} tokens minted, {} retained for payouts and grants",
        ctx.accounts.sale.total_raised,
        allocation.total_supply,
        allocation.retained_in_vault()
    );

    emit!(SaleFinalized {
        sale: sale_key,
        total_raised: ctx.accounts.sale.total_raised,
        total_supply: allocation.total_supply,
        sold_supply: allocation.sold_supply,
        early_investor_share: allocation.early_investor_share,
        team_pool_grant: allocation.team_pool_grant,
        foundation_share: allocation.foundation_share,
        strategy_fund_share: allocation.strategy_fund_share,
        finalized_at: now,
        finalized_by: ctx.accounts.payer.key(),
    });

    Ok(())
}
