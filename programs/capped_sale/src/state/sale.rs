/**
 * Sale State
 *
 * Funding window, soft-cap rule and the one-shot finalize transition.
 *
 * WINDOW:
 *   Pending   now < start_time
 *   Active    start_time <= now < end_time
 *   Paused    authority suspended contributions
 *   Closed    now >= end_time
 *   Finalized terminal, supply distributed
 *
 * SOFT CAP:
 *   The first contribution that brings total_raised to soft_cap pulls
 *   end_time in to now + clamp(elapsed, min_delay, max_delay).
 *   end_time never grows back.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::{Allocation, Contribution, Grant},
    SaleError,
};

// =============================================================================
// ENUMS
// =============================================================================

/// Stored status of the sale
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SaleStatus {
    /// Accepting contributions while inside the window
    Open,
    /// Contributions suspended by the authority
    Paused,
    /// Supply minted and distributed (terminal)
    Finalized,
}

impl Default for SaleStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Observable phase, derived from status and the clock
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SalePhase {
    Pending,
    Active,
    Paused,
    Closed,
    Finalized,
}

// =============================================================================
// PARAMETERS
// =============================================================================

/// Fixed recipients of the non-public supply
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct BeneficiaryKeys {
    /// Receives the early investor share at finalize
    pub investor: Pubkey,
    /// Receives the first fixed member allocation at finalize
    pub member_one: Pubkey,
    /// Receives the second fixed member allocation at finalize
    pub member_two: Pubkey,
    /// Vesting grant: team share minus member allocations
    pub team_pool: Pubkey,
    /// Vesting grant: foundation share
    pub foundation: Pubkey,
    /// Receives the rounding remainder at finalize
    pub strategy_fund: Pubkey,
}

impl BeneficiaryKeys {
    pub const LEN: usize = 6 * 32;

    pub fn all(&self) -> [Pubkey; 6] {
        [
            self.investor,
            self.member_one,
            self.member_two,
            self.team_pool,
            self.foundation,
            self.strategy_fund,
        ]
    }
}

/// Construction parameters for `initialize_sale`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct InitializeSaleParams {
    /// Controller for pause/resume and purchase payouts, may differ from the payer
    pub authority: Pubkey,

    /// Unix timestamp the window opens, must be in the future
    pub start_time: i64,

    /// Longest possible window in seconds
    pub max_duration: i64,

    /// Lamports required for finalize to succeed
    pub min_to_raise: u64,

    /// Lamports that trigger the window shortening
    pub soft_cap: u64,

    /// Lower bound of the post-cap countdown (seconds)
    pub post_cap_min_delay: i64,

    /// Upper bound of the post-cap countdown (seconds)
    pub post_cap_max_delay: i64,

    /// Token base units per contributed lamport
    pub token_price_multiplier: u64,

    /// Smallest accepted contribution in lamports
    pub min_contribution: u64,

    /// Fixed token allocation for member one
    pub member_one_allocation: u64,

    /// Fixed token allocation for member two
    pub member_two_allocation: u64,

    pub beneficiaries: BeneficiaryKeys,
}

impl InitializeSaleParams {
    /// Check the parameters against the current time
    pub fn validate(&self, now: i64) -> std::result::Result<(), SaleError> {
        if self.start_time <= now {
            return Err(SaleError::InvalidStartTime);
        }
        if self.max_duration <= 0 {
            return Err(SaleError::InvalidDuration);
        }
        if self.post_cap_min_delay <= 0 || self.post_cap_min_delay >= self.post_cap_max_delay {
            return Err(SaleError::InvalidDelayWindow);
        }
        if self.token_price_multiplier == 0 {
            return Err(SaleError::InvalidPriceMultiplier);
        }
        if self.authority == Pubkey::default()
            || self.beneficiaries.all().iter().any(|key| *key == Pubkey::default())
        {
            return Err(SaleError::ZeroAddress);
        }
        // Both grants are PDAs keyed by beneficiary
        if self.beneficiaries.team_pool == self.beneficiaries.foundation {
            return Err(SaleError::DuplicateBeneficiary);
        }
        self.max_end_time().map(|_| ())
    }

    pub fn max_end_time(&self) -> std::result::Result<i64, SaleError> {
        self.start_time
            .checked_add(self.max_duration)
            .ok_or(SaleError::MathOverflow)
    }
}

// =============================================================================
// SALE ACCOUNT
// =============================================================================

/// Sale account
/// Holds the immutable configuration and the mutable window state
#[account]
pub struct Sale {
    /// Controller for pause/resume and purchase payouts
    pub authority: Pubkey,

    /// Token mint sold by this sale
    pub mint: Pubkey,

    /// Token account (owned by this PDA) holding undistributed supply
    pub vault: Pubkey,

    /// Receives every accepted contribution immediately
    pub settlement_wallet: Pubkey,

    pub beneficiaries: BeneficiaryKeys,

    pub start_time: i64,

    /// start_time + max duration
    pub max_end_time: i64,

    /// Current deadline, only ever shortened
    pub end_time: i64,

    pub post_cap_min_delay: i64,

    pub post_cap_max_delay: i64,

    pub token_price_multiplier: u64,

    pub min_contribution: u64,

    pub min_to_raise: u64,

    pub soft_cap: u64,

    pub member_one_allocation: u64,

    pub member_two_allocation: u64,

    /// Sum of every contribution record
    pub total_raised: u64,

    /// Distinct participants
    pub contributor_count: u64,

    /// Set by the first contribution reaching soft_cap
    pub soft_cap_reached: bool,

    pub status: SaleStatus,

    /// 0 until finalized
    pub finalized_at: i64,

    /// Snapshot of the allocation, 0 until finalized
    pub sold_supply: u64,
    pub total_supply: u64,

    /// Bump seed for PDA
    pub bump: u8,

    /// Bump seed for the vault PDA
    pub vault_bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl Sale {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // mint
        32 + // vault
        32 + // settlement_wallet
        BeneficiaryKeys::LEN + // beneficiaries
        8 +  // start_time
        8 +  // max_end_time
        8 +  // end_time
        8 +  // post_cap_min_delay
        8 +  // post_cap_max_delay
        8 +  // token_price_multiplier
        8 +  // min_contribution
        8 +  // min_to_raise
        8 +  // soft_cap
        8 +  // member_one_allocation
        8 +  // member_two_allocation
        8 +  // total_raised
        8 +  // contributor_count
        1 +  // soft_cap_reached
        1 +  // status
        8 +  // finalized_at
        8 +  // sold_supply
        8 +  // total_supply
        1 +  // bump
        1 +  // vault_bump
        64;  // reserved

    /// Copy validated parameters into a freshly created account
    pub fn configure(&mut self, params: &InitializeSaleParams) -> std::result::Result<(), SaleError> {
        let max_end_time = params.max_end_time()?;

        self.authority = params.authority;
        self.beneficiaries = params.beneficiaries;
        self.start_time = params.start_time;
        self.max_end_time = max_end_time;
        self.end_time = max_end_time;
        self.post_cap_min_delay = params.post_cap_min_delay;
        self.post_cap_max_delay = params.post_cap_max_delay;
        self.token_price_multiplier = params.token_price_multiplier;
        self.min_contribution = params.min_contribution;
        self.min_to_raise = params.min_to_raise;
        self.soft_cap = params.soft_cap;
        self.member_one_allocation = params.member_one_allocation;
        self.member_two_allocation = params.member_two_allocation;
        self.total_raised = 0;
        self.contributor_count = 0;
        self.soft_cap_reached = false;
        self.status = SaleStatus::Open;
        self.finalized_at = 0;
        self.sold_supply = 0;
        self.total_supply = 0;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.status == SaleStatus::Finalized
    }

    pub fn is_paused(&self) -> bool {
        self.status == SaleStatus::Paused
    }

    /// Current observable phase
    pub fn phase(&self, now: i64) -> SalePhase {
        match self.status {
            SaleStatus::Finalized => SalePhase::Finalized,
            _ if now >= self.end_time => SalePhase::Closed,
            SaleStatus::Paused => SalePhase::Paused,
            _ if now < self.start_time => SalePhase::Pending,
            SaleStatus::Open => SalePhase::Active,
        }
    }

    pub fn ensure_not_finalized(&self) -> std::result::Result<(), SaleError> {
        if self.is_finalized() {
            return Err(SaleError::AlreadyFinalized);
        }
        Ok(())
    }

    pub fn ensure_finalized(&self) -> std::result::Result<(), SaleError> {
        if !self.is_finalized() {
            return Err(SaleError::NotFinalized);
        }
        Ok(())
    }

    // =========================================================================
    // PAUSE / RESUME
    // =========================================================================

    pub fn pause(&mut self) -> std::result::Result<(), SaleError> {
        self.ensure_not_finalized()?;
        if self.is_paused() {
            return Err(SaleError::SalePaused);
        }
        self.status = SaleStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> std::result::Result<(), SaleError> {
        self.ensure_not_finalized()?;
        if !self.is_paused() {
            return Err(SaleError::SaleNotPaused);
        }
        self.status = SaleStatus::Open;
        Ok(())
    }

    // =========================================================================
    // CONTRIBUTIONS
    // =========================================================================

    /// Reject a contribution that cannot be accepted right now
    pub fn check_contribution(&self, amount: u64, now: i64) -> std::result::Result<(), SaleError> {
        self.ensure_not_finalized()?;
        if self.is_paused() {
            return Err(SaleError::SalePaused);
        }
        if now < self.start_time {
            return Err(SaleError::SaleNotStarted);
        }
        if now >= self.end_time {
            return Err(SaleError::SaleEnded);
        }
        if amount < self.min_contribution {
            return Err(SaleError::ContributionBelowMinimum);
        }
        Ok(())
    }

    /// Record an accepted contribution against the participant's record.
    ///
    /// Nothing is written unless every check passes. Returns the previous
    /// end_time when this contribution shortened the window.
    pub fn record_contribution(
        &mut self,
        contribution: &mut Contribution,
        amount: u64,
        now: i64,
    ) -> std::result::Result<Option<i64>, SaleError> {
        self.check_contribution(amount, now)?;

        let participant_total = contribution
            .amount
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;
        let total_raised = self
            .total_raised
            .checked_add(amount)
            .ok_or(SaleError::MathOverflow)?;

        // Counted on the first non-zero amount only
        if contribution.amount == 0 && participant_total > 0 {
            self.contributor_count = self.contributor_count.saturating_add(1);
        }
        contribution.amount = participant_total;
        self.total_raised = total_raised;

        Ok(self.apply_soft_cap(now))
    }

    /// Deadline the window would get if the soft cap were crossed at `now`
    pub fn post_cap_end_time(&self, now: i64) -> i64 {
        let elapsed = now.saturating_sub(self.start_time);
        let delay = elapsed.clamp(self.post_cap_min_delay, self.post_cap_max_delay);
        now.saturating_add(delay).min(self.max_end_time)
    }

    /// Shorten the window the first time the soft cap is reached.
    /// Returns the previous end_time when it changed.
    pub fn apply_soft_cap(&mut self, now: i64) -> Option<i64> {
        if self.soft_cap_reached || self.total_raised < self.soft_cap {
            return None;
        }
        self.soft_cap_reached = true;

        let candidate = self.post_cap_end_time(now);
        if candidate >= self.end_time {
            return None;
        }

        let previous = self.end_time;
        self.end_time = candidate;
        Some(previous)
    }

    // =========================================================================
    // FINALIZE
    // =========================================================================

    /// Check finalize preconditions and compute the allocation.
    /// Does not mutate; call `mark_finalized` once this succeeds.
    pub fn prepare_finalize(&self, now: i64) -> std::result::Result<Allocation, SaleError> {
        self.ensure_not_finalized()?;
        if now < self.end_time {
            return Err(SaleError::SaleNotEnded);
        }
        if self.total_raised < self.min_to_raise {
            return Err(SaleError::MinimumRaiseNotReached);
        }

        Allocation::compute(
            self.total_raised,
            self.token_price_multiplier,
            self.member_one_allocation,
            self.member_two_allocation,
        )
    }

    /// Enter the terminal state
    pub fn mark_finalized(&mut self, allocation: &Allocation, now: i64) {
        self.status = SaleStatus::Finalized;
        self.finalized_at = now;
        self.sold_supply = allocation.sold_supply;
        self.total_supply = allocation.total_supply;
    }

    /// Tokens owed for a contributed amount
    pub fn purchased_tokens(&self, contributed: u64) -> std::result::Result<u64, SaleError> {
        contributed
            .checked_mul(self.token_price_multiplier)
            .ok_or(SaleError::MathOverflow)
    }

    /// Months and amount `grant` could release now; nothing before finalize
    pub fn claimable_vested(&self, grant: &Grant, now: i64) -> (u64, u64) {
        if !self.is_finalized() {
            return (grant.months_claimed, 0);
        }
        grant.claimable(self.finalized_at, now)
    }

    pub fn status_view(&self, now: i64) -> SaleStatusView {
        SaleStatusView {
            phase: self.phase(now),
            start_time: self.start_time,
            end_time: self.end_time,
            max_end_time: self.max_end_time,
            total_raised: self.total_raised,
            contributor_count: self.contributor_count,
            soft_cap_reached: self.soft_cap_reached,
            paused: self.is_paused(),
            finalized: self.is_finalized(),
            finalized_at: self.finalized_at,
            total_supply: self.total_supply,
        }
    }
}

/// Read-only snapshot returned by `get_sale_status`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleStatusView {
    pub phase: SalePhase,
    pub start_time: i64,
    pub end_time: i64,
    pub max_end_time: i64,
    pub total_raised: u64,
    pub contributor_count: u64,
    pub soft_cap_reached: bool,
    pub paused: bool,
    pub finalized: bool,
    pub finalized_at: i64,
    pub total_supply: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_000_000;
    const DAY: i64 = 24 * 60 * 60;

    fn params() -> InitializeSaleParams {
        InitializeSaleParams {
            authority: Pubkey::new_unique(),
            start_time: START,
            max_duration: 30 * DAY,
            min_to_raise: 5_000,
            soft_cap: 10_000,
            post_cap_min_delay: DAY,
            post_cap_max_delay: 7 * DAY,
            token_price_multiplier: 1_000,
            min_contribution: 100,
            member_one_allocation: 0,
            member_two_allocation: 0,
            beneficiaries: BeneficiaryKeys {
                investor: Pubkey::new_unique(),
                member_one: Pubkey::new_unique(),
                member_two: Pubkey::new_unique(),
                team_pool: Pubkey::new_unique(),
                foundation: Pubkey::new_unique(),
                strategy_fund: Pubkey::new_unique(),
            },
        }
    }

    fn sale() -> Sale {
        let mut sale = Sale {
            authority: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            settlement_wallet: Pubkey::new_unique(),
            beneficiaries: BeneficiaryKeys::default(),
            start_time: 0,
            max_end_time: 0,
            end_time: 0,
            post_cap_min_delay: 0,
            post_cap_max_delay: 0,
            token_price_multiplier: 0,
            min_contribution: 0,
            min_to_raise: 0,
            soft_cap: 0,
            member_one_allocation: 0,
            member_two_allocation: 0,
            total_raised: 0,
            contributor_count: 0,
            soft_cap_reached: false,
            status: SaleStatus::Open,
            finalized_at: 0,
            sold_supply: 0,
            total_supply: 0,
            bump: 255,
            vault_bump: 254,
            reserved: [0; 64],
        };
        sale.configure(&params()).unwrap();
        sale
    }

    fn record() -> Contribution {
        Contribution {
            sale: Pubkey::new_unique(),
            participant: Pubkey::new_unique(),
            amount: 0,
            claimed: 0,
            bump: 255,
        }
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(params().validate(START - 1).is_ok());
        assert!(matches!(params().validate(START), Err(SaleError::InvalidStartTime)));

        let mut p = params();
        p.post_cap_min_delay = 0;
        assert!(matches!(p.validate(0), Err(SaleError::InvalidDelayWindow)));

        let mut p = params();
        p.post_cap_min_delay = p.post_cap_max_delay;
        assert!(matches!(p.validate(0), Err(SaleError::InvalidDelayWindow)));

        let mut p = params();
        p.max_duration = 0;
        assert!(matches!(p.validate(0), Err(SaleError::InvalidDuration)));

        let mut p = params();
        p.token_price_multiplier = 0;
        assert!(matches!(p.validate(0), Err(SaleError::InvalidPriceMultiplier)));

        let mut p = params();
        p.beneficiaries.strategy_fund = Pubkey::default();
        assert!(matches!(p.validate(0), Err(SaleError::ZeroAddress)));

        let mut p = params();
        p.authority = Pubkey::default();
        assert!(matches!(p.validate(0), Err(SaleError::ZeroAddress)));

        let mut p = params();
        p.beneficiaries.foundation = p.beneficiaries.team_pool;
        assert!(matches!(p.validate(0), Err(SaleError::DuplicateBeneficiary)));

        let mut p = params();
        p.start_time = i64::MAX - 1;
        assert!(matches!(p.validate(0), Err(SaleError::MathOverflow)));
    }

    #[test]
    fn configure_opens_full_window() {
        let p = params();
        let mut s = sale();
        s.configure(&p).unwrap();
        assert_eq!(s.authority, p.authority);
        assert_eq!(s.max_end_time, START + 30 * DAY);
        assert_eq!(s.end_time, s.max_end_time);
        assert_eq!(s.phase(START - 1), SalePhase::Pending);
        assert_eq!(s.phase(START), SalePhase::Active);
        assert_eq!(s.phase(s.end_time), SalePhase::Closed);
    }

    #[test]
    fn contribution_outside_window_is_rejected() {
        let mut s = sale();
        let mut c = record();

        let early = s.record_contribution(&mut c, 1_000, START - 1);
        assert!(matches!(early, Err(SaleError::SaleNotStarted)));

        let late = s.record_contribution(&mut c, 1_000, s.end_time);
        assert!(matches!(late, Err(SaleError::SaleEnded)));

        assert_eq!(c.amount, 0);
        assert_eq!(s.total_raised, 0);
    }

    #[test]
    fn contribution_below_minimum_is_rejected() {
        let mut s = sale();
        let mut c = record();

        let result = s.record_contribution(&mut c, s.min_contribution - 1, START);
        assert!(matches!(result, Err(SaleError::ContributionBelowMinimum)));
        assert_eq!(c.amount, 0);
        assert_eq!(s.total_raised, 0);
        assert_eq!(s.contributor_count, 0);

        assert!(s.record_contribution(&mut c, s.min_contribution, START).is_ok());
        assert_eq!(c.amount, 100);
    }

    #[test]
    fn ledger_sum_matches_total_raised() {
        let mut s = sale();
        let mut records = vec![record(), record(), record()];
        let amounts = [100u64, 250, 1_000, 333, 100, 4_000];

        for (i, amount) in amounts.iter().enumerate() {
            let c = &mut records[i % 3];
            s.record_contribution(c, *amount, START + i as i64).unwrap();
            let sum: u64 = records.iter().map(|r| r.amount).sum();
            assert_eq!(sum, s.total_raised);
        }
        assert_eq!(s.contributor_count, 3);
    }

    #[test]
    fn zero_contributions_do_not_count_participants() {
        let mut p = params();
        p.min_contribution = 0;
        let mut s = sale();
        s.configure(&p).unwrap();
        let mut c = record();

        s.record_contribution(&mut c, 0, START).unwrap();
        s.record_contribution(&mut c, 0, START + 1).unwrap();
        assert_eq!(s.contributor_count, 0);

        s.record_contribution(&mut c, 500, START + 2).unwrap();
        s.record_contribution(&mut c, 0, START + 3).unwrap();
        s.record_contribution(&mut c, 250, START + 4).unwrap();
        assert_eq!(s.contributor_count, 1);
        assert_eq!(c.amount, 750);
        assert_eq!(s.total_raised, 750);
    }

    #[test]
    fn paused_sale_rejects_and_keeps_deadline() {
        let mut s = sale();
        let mut c = record();
        let end = s.end_time;

        s.pause().unwrap();
        assert!(matches!(s.pause(), Err(SaleError::SalePaused)));
        assert_eq!(s.phase(START), SalePhase::Paused);

        let result = s.record_contribution(&mut c, 1_000, START);
        assert!(matches!(result, Err(SaleError::SalePaused)));

        s.resume().unwrap();
        assert!(matches!(s.resume(), Err(SaleError::SaleNotPaused)));
        assert_eq!(s.end_time, end);
        assert!(s.record_contribution(&mut c, 1_000, START).is_ok());
    }

    #[test]
    fn soft_cap_clamps_to_min_delay() {
        let mut s = sale();
        let mut c = record();

        // Crossed one hour in: elapsed < min delay
        let now = START + 3_600;
        let previous = s.record_contribution(&mut c, 10_000, now).unwrap();

        assert_eq!(previous, Some(START + 30 * DAY));
        assert_eq!(s.end_time, now + DAY);
        assert!(s.soft_cap_reached);
    }

    #[test]
    fn soft_cap_uses_elapsed_time_inside_bounds() {
        let mut s = sale();
        let mut c = record();

        let now = START + 3 * DAY;
        s.record_contribution(&mut c, 10_000, now).unwrap();
        assert_eq!(s.end_time, now + 3 * DAY);
    }

    #[test]
    fn soft_cap_clamps_to_max_delay_and_max_end() {
        let mut s = sale();
        let mut c = record();

        let now = START + 10 * DAY;
        s.record_contribution(&mut c, 10_000, now).unwrap();
        assert_eq!(s.end_time, now + 7 * DAY);

        let mut late = sale();
        let now = START + 28 * DAY;
        let previous = late.record_contribution(&mut c, 10_000, now).unwrap();
        assert_eq!(previous, None);
        assert_eq!(late.end_time, late.max_end_time);
        assert!(late.soft_cap_reached);
    }

    #[test]
    fn end_time_only_shortens_once() {
        let mut s = sale();
        let mut c = record();
        let mut last_end = s.end_time;
        let mut adjustments = 0;

        for i in 0..12 {
            let now = START + i * 3_600;
            if let Some(previous) = s.record_contribution(&mut c, 2_500, now).unwrap() {
                assert_eq!(previous, last_end);
                adjustments += 1;
            }
            assert!(s.end_time <= last_end);
            assert!(s.end_time <= s.max_end_time);
            last_end = s.end_time;
        }

        assert_eq!(adjustments, 1);
        assert_eq!(s.apply_soft_cap(START + 5 * 3_600), None);
    }

    #[test]
    fn finalize_requires_closed_window_and_minimum() {
        let mut s = sale();
        let mut c = record();
        s.record_contribution(&mut c, 1_000, START).unwrap();

        let open = s.prepare_finalize(START + DAY);
        assert!(matches!(open, Err(SaleError::SaleNotEnded)));

        let short = s.prepare_finalize(s.end_time);
        assert!(matches!(short, Err(SaleError::MinimumRaiseNotReached)));
        assert!(!s.is_finalized());
    }

    #[test]
    fn finalize_runs_once() {
        let mut s = sale();
        let mut c = record();
        s.record_contribution(&mut c, 10_000, START + 3 * DAY).unwrap();

        let now = s.end_time;
        let allocation = s.prepare_finalize(now).unwrap();
        assert_eq!(allocation.total_supply, 19_607_843);

        s.mark_finalized(&allocation, now);
        assert_eq!(s.phase(now), SalePhase::Finalized);
        assert_eq!(s.finalized_at, now);
        assert_eq!(s.total_supply, 19_607_843);

        assert!(matches!(s.prepare_finalize(now + 1), Err(SaleError::AlreadyFinalized)));
        assert!(matches!(s.pause(), Err(SaleError::AlreadyFinalized)));
        assert!(matches!(
            s.record_contribution(&mut c, 1_000, now),
            Err(SaleError::AlreadyFinalized)
        ));
    }

    #[test]
    fn finalize_surfaces_team_underflow_without_mutation() {
        let mut p = params();
        p.member_one_allocation = 1_000_000;
        p.member_two_allocation = 1_000_000;
        let mut s = sale();
        s.configure(&p).unwrap();

        let mut c = record();
        s.record_contribution(&mut c, 10_000, START).unwrap();

        let result = s.prepare_finalize(s.end_time);
        assert!(matches!(result, Err(SaleError::TeamShareBelowFixedAllocations)));
        assert!(!s.is_finalized());
        assert_eq!(s.finalized_at, 0);
    }

    #[test]
    fn nothing_vests_before_finalize() {
        let mut s = sale();
        let mut c = record();
        s.record_contribution(&mut c, 10_000, START).unwrap();

        let grant = Grant {
            sale: Pubkey::new_unique(),
            beneficiary: s.beneficiaries.team_pool,
            total_granted: 2_400,
            total_claimed: 0,
            months_claimed: 0,
            bump: 255,
        };

        // Far past any cliff, but the sale never finalized
        let late = START + 40 * 30 * DAY;
        assert_eq!(s.claimable_vested(&grant, late), (0, 0));

        let now = s.end_time;
        let allocation = s.prepare_finalize(now).unwrap();
        s.mark_finalized(&allocation, now);
        assert_eq!(s.claimable_vested(&grant, now), (0, 0));
        assert_eq!(s.claimable_vested(&grant, now + 7 * 30 * DAY), (1, 100));
        assert_eq!(s.claimable_vested(&grant, now + 30 * 30 * DAY), (24, 2_400));
    }

    #[test]
    fn paused_sale_can_still_finalize() {
        let mut s = sale();
        let mut c = record();
        s.record_contribution(&mut c, 6_000, START).unwrap();
        s.pause().unwrap();

        assert!(s.prepare_finalize(s.end_time).is_ok());
    }
}
