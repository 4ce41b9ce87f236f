/**
 * Status Views
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::{Contribution, Sale, SalePhase, SaleStatusView},
    CONTRIBUTION_SEED,
    SALE_SEED,
};

// =============================================================================
// GET SALE STATUS
// =============================================================================

#[derive(Accounts)]
pub struct GetSaleStatus<'info> {
    #[account(
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
}

pub fn sale_status_handler(ctx: Context<GetSaleStatus>) -> Result<SaleStatusView> {
    let sale = &ctx.accounts.sale;
    let clock = Clock::get()?;
    let view = sale.status_view(clock.unix_timestamp);

    let phase_str = match view.phase {
        SalePhase::Pending => "PENDING",
        SalePhase::Active => "ACTIVE",
        SalePhase::Paused => "PAUSED",
        SalePhase::Closed => "CLOSED",
        SalePhase::Finalized => "FINALIZED",
    };

    msg!("╔══════════════════════════════════════════════════════════════╗");
    msg!("║           SALE STATUS                                        ║");
    msg!("╠══════════════════════════════════════════════════════════════╣");
    msg!("║ Phase: {}", phase_str);
    msg!("║ Window: {} → {} (max {})", view.start_time, view.end_time, view.max_end_time);
    msg!("║ Soft cap reached: {}", view.soft_cap_reached);
    msg!("║");
    msg!("║ Total raised: {} / soft cap {}", view.total_raised, sale.soft_cap);
    msg!("║ Minimum to raise: {}", sale.min_to_raise);
    msg!("║ Contributors: {}", view.contributor_count);
    if view.finalized {
        msg!("║ Finalized at: {}", view.finalized_at);
        msg!("║ Total supply: {}", view.total_supply);
    }
    msg!("╚══════════════════════════════════════════════════════════════╝");

    Ok(view)
}

// =============================================================================
// GET CONTRIBUTION
// =============================================================================

#[derive(Accounts)]
pub struct GetContribution<'info> {
    #[account(
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        seeds = [CONTRIBUTION_SEED, sale.key().as_ref(), contribution.participant.as_ref()],
        bump = contribution.bump,
    )]
    pub contribution: Account<'info, Contribution>,
}

pub fn contribution_handler(ctx: Context<GetContribution>) -> Result<u64> {
    let contribution = &ctx.accounts.contribution;

    msg!(
        "Contribution {}: {} lamports recorded, {} tokens paid",
        contribution.participant,
        contribution.amount,
        contribution.claimed
    );

    Ok(contribution.amount)
}
