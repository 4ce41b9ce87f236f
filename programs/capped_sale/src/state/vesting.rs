/**
 * Vesting Grant State
 *
 * Implements a cliff followed by monthly tranches.
 * Grants are created once at finalize and released by self-service claims.
 *
 * SCHEDULE:
 *   finalized_at .. +6 months   cliff, nothing claimable
 *   each full month after cliff 1/24 of the grant
 *   24th month after cliff      whatever is left
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    SaleError,
    SECONDS_PER_MONTH,
    VESTING_CLIFF_SECONDS,
    VESTING_MONTHS,
};

/// Vesting grant account
/// One PDA per (sale, beneficiary)
#[account]
pub struct Grant {
    /// Sale that created this grant
    pub sale: Pubkey,

    /// Wallet allowed to claim
    pub beneficiary: Pubkey,

    /// Amount granted at finalize
    pub total_granted: u64,

    /// Amount released so far
    pub total_claimed: u64,

    /// Monthly tranches released so far (<= 24)
    pub months_claimed: u64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl Grant {
    pub const LEN: usize = 8 + // discriminator
        32 + // sale
        32 + // beneficiary
        8 +  // total_granted
        8 +  // total_claimed
        8 +  // months_claimed
        1;   // bump

    pub fn open(&mut self, sale: Pubkey, beneficiary: Pubkey, total_granted: u64, bump: u8) {
        self.sale = sale;
        self.beneficiary = beneficiary;
        self.total_granted = total_granted;
        self.total_claimed = 0;
        self.months_claimed = 0;
        self.bump = bump;
    }

    /// Check if cliff period has passed
    pub fn cliff_passed(finalized_at: i64, current_time: i64) -> bool {
        current_time >= finalized_at.saturating_add(VESTING_CLIFF_SECONDS)
    }

    /// Whole months elapsed since the cliff ended, capped at the schedule
    pub fn eligible_months(finalized_at: i64, current_time: i64) -> u64 {
        if !Self::cliff_passed(finalized_at, current_time) {
            return 0;
        }

        let since_cliff = current_time - finalized_at.saturating_add(VESTING_CLIFF_SECONDS);
        ((since_cliff / SECONDS_PER_MONTH) as u64).min(VESTING_MONTHS)
    }

    pub fn remaining(&self) -> u64 {
        self.total_granted.saturating_sub(self.total_claimed)
    }

    /// Months and amount a claim would release right now.
    ///
    /// Months are counted from the end of the cliff, not from finalize:
    /// the first tranche unlocks 7 months after `finalized_at` and the
    /// 24th (final) one 30 months after it.
    pub fn claimable(&self, finalized_at: i64, current_time: i64) -> (u64, u64) {
        let eligible = Self::eligible_months(finalized_at, current_time);
        if eligible <= self.months_claimed {
            return (self.months_claimed, 0);
        }

        if eligible == VESTING_MONTHS {
            // Final tranche sweeps rounding dust
            return (eligible, self.remaining());
        }

        let new_months = eligible - self.months_claimed;
        let tranche = (self.total_granted as u128 * new_months as u128 / VESTING_MONTHS as u128) as u64;
        (eligible, tranche.min(self.remaining()))
    }

    /// Release every tranche due at `current_time`.
    ///
    /// Returns the amount to transfer. Records are updated before the
    /// caller moves any tokens. Returns 0 without touching the grant when
    /// no new month has elapsed.
    pub fn claim(&mut self, finalized_at: i64, current_time: i64) -> std::result::Result<u64, SaleError> {
        if !Self::cliff_passed(finalized_at, current_time) {
            return Err(SaleError::CliffNotPassed);
        }

        let (months, amount) = self.claimable(finalized_at, current_time);
        if months == self.months_claimed {
            return Ok(0);
        }

        self.months_claimed = months;
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;
        Ok(amount)
    }
}
