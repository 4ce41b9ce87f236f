/**
 * Contribute Instruction
 *
 * Records a contribution and forwards the lamports to the settlement
 * wallet. No escrow: value leaves the program immediately.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::{
    state::{Contribution, Sale},
    ContributionRecorded,
    SaleEndTimeShortened,
    SaleError,
    CONTRIBUTION_SEED,
    SALE_SEED,
};

#[derive(Accounts)]
pub struct Contribute<'info> {
    #[account(mut)]
    pub participant: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED, sale.mint.as_ref()],
        bump = sale.bump,
        has_one = settlement_wallet @ SaleError::InvalidSettlementWallet,
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        init_if_needed,
        payer = participant,
        space = Contribution::LEN,
        seeds = [CONTRIBUTION_SEED, sale.key().as_ref(), participant.key().as_ref()],
        bump,
    )]
    pub contribution: Account<'info, Contribution>,

    /// CHECK: Matched against sale.settlement_wallet
    #[account(mut)]
    pub settlement_wallet: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn contribute_handler(ctx: Context<Contribute>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let sale = &mut ctx.accounts.sale;
    let contribution = &mut ctx.accounts.contribution;

    // Fresh record from init_if_needed
    if contribution.participant == Pubkey::default() {
        contribution.sale = sale.key();
        contribution.participant = ctx.accounts.participant.key();
        contribution.bump = ctx.bumps.contribution;
    }

    // Effects first
    let previous_end_time = sale.record_contribution(contribution, amount, clock.unix_timestamp)?;

    // Then move the value
    transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.participant.to_account_info(),
                to: ctx.accounts.settlement_wallet.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(ContributionRecorded {
        sale: sale.key(),
        participant: contribution.participant,
        amount,
        participant_total: contribution.amount,
        total_raised: sale.total_raised,
    });

    if let Some(previous_end_time) = previous_end_time {
        msg!(
            "Soft cap reached: sale now ends at {} (was {})",
            sale.end_time,
            previous_end_time
        );

        emit!(SaleEndTimeShortened {
            sale: sale.key(),
            previous_end_time,
            new_end_time: sale.end_time,
            total_raised: sale.total_raised,
        });
    }

    Ok(())
}
