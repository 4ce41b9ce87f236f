/**
 * Pause / Resume Instructions
 *
 * Suspension never moves the deadline: the window is clock based.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::Sale,
    SaleError,
    SaleResumed,
    SaleSuspended,
    SALE_SEED,
};

// =============================================================================
// PAUSE SALE
// =============================================================================

#[derive(Accounts)]
pub struct PauseSale<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
        has_one = authority @ SaleError::Unauthorized,
    )]
    pub sale: Account<'info, Sale>,
}

pub fn pause_handler(ctx: Context<PauseSale>) -> Result<()> {
    let sale = &mut ctx.accounts.sale;

    sale.pause()?;

    emit!(SaleSuspended {
        sale: sale.key(),
        paused_by: ctx.accounts.authority.key(),
    });

    Ok(())
}

// =============================================================================
// RESUME SALE
// =============================================================================

#[derive(Accounts)]
pub struct ResumeSale<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
        has_one = authority @ SaleError::Unauthorized,
    )]
    pub sale: Account<'info, Sale>,
}

pub fn resume_handler(ctx: Context<ResumeSale>) -> Result<()> {
    let sale = &mut ctx.accounts.sale;

    sale.resume()?;

    emit!(SaleResumed {
        sale: sale.key(),
        resumed_by: ctx.accounts.authority.key(),
    });

    Ok(())
}
