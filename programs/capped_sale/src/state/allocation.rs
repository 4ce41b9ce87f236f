/**
 * Finalize-time Supply Allocation
 *
 * Splits the minted supply between the public sale, the fixed
 * beneficiaries and the two vesting grants.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    SaleError,
    EARLY_INVESTOR_PERCENT,
    FOUNDATION_PERCENT,
    SOLD_SUPPLY_PERCENT,
    TEAM_PERCENT,
};

/// Result of the one-shot allocation run
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Tokens owed to contributors (51% of supply)
    pub sold_supply: u64,

    /// Full amount minted at finalize
    pub total_supply: u64,

    /// Transferred to the investor at finalize
    pub early_investor_share: u64,

    /// Members + team pool
    pub team_share: u64,

    /// Vested to the foundation
    pub foundation_share: u64,

    /// Fixed allocation transferred to member one at finalize
    pub member_one_allocation: u64,

    /// Fixed allocation transferred to member two at finalize
    pub member_two_allocation: u64,

    /// Team share left after the member allocations, vested to the team pool
    pub team_pool_grant: u64,

    /// Remainder after every other share, absorbs all rounding
    pub strategy_fund_share: u64,
}

impl Allocation {
    /// Compute the allocation for a closed sale.
    ///
    /// Steps run in a fixed order with truncating division so rounding
    /// always lands in the strategy fund. Fails before anything is
    /// mutated when the team share cannot cover the member allocations.
    pub fn compute(
        total_raised: u64,
        token_price_multiplier: u64,
        member_one_allocation: u64,
        member_two_allocation: u64,
    ) -> std::result::Result<Self, SaleError> {
        let sold_supply = (total_raised as u128)
            .checked_mul(token_price_multiplier as u128)
            .ok_or(SaleError::MathOverflow)?;

        let total_supply = sold_supply
            .checked_mul(100)
            .ok_or(SaleError::MathOverflow)?
            / SOLD_SUPPLY_PERCENT;

        let early_investor_share = total_supply * EARLY_INVESTOR_PERCENT / 100;
        let team_share = total_supply * TEAM_PERCENT / 100;
        let foundation_share = total_supply * FOUNDATION_PERCENT / 100;

        let fixed_members = (member_one_allocation as u128)
            .checked_add(member_two_allocation as u128)
            .ok_or(SaleError::MathOverflow)?;

        // Surfaced, never clamped
        let team_pool_grant = team_share
            .checked_sub(fixed_members)
            .ok_or(SaleError::TeamShareBelowFixedAllocations)?;

        let strategy_fund_share = total_supply
            .checked_sub(early_investor_share + team_share + foundation_share + sold_supply)
            .ok_or(SaleError::MathOverflow)?;

        Ok(Self {
            sold_supply: to_u64(sold_supply)?,
            total_supply: to_u64(total_supply)?,
            early_investor_share: to_u64(early_investor_share)?,
            team_share: to_u64(team_share)?,
            foundation_share: to_u64(foundation_share)?,
            member_one_allocation,
            member_two_allocation,
            team_pool_grant: to_u64(team_pool_grant)?,
            strategy_fund_share: to_u64(strategy_fund_share)?,
        })
    }

    /// Amount that stays in the sale vault after the immediate transfers
    pub fn retained_in_vault(&self) -> u64 {
        // sold + team pool + foundation <= total_supply, cannot overflow
        self.sold_supply + self.team_pool_grant + self.foundation_share
    }
}

fn to_u64(value: u128) -> std::result::Result<u64, SaleError> {
    u64::try_from(value).map_err(|_| SaleError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario() {
        let a = Allocation::compute(10_000, 1_000, 0, 0).unwrap();

        assert_eq!(a.sold_supply, 10_000_000);
        assert_eq!(a.total_supply, 19_607_843);
        assert_eq!(a.early_investor_share, 980_392);
        assert_eq!(a.team_share, 1_960_784);
        assert_eq!(a.foundation_share, 2_941_176);
        assert_eq!(a.strategy_fund_share, 3_725_491);
    }

    #[test]
    fn parts_sum_to_total_supply() {
        for raised in [1u64, 7, 51, 999, 10_000, 123_456_789, 5_000_000_000_000] {
            let a = Allocation::compute(raised, 1_000, 0, 0).unwrap();
            let sum = a.sold_supply
                + a.early_investor_share
                + a.team_share
                + a.foundation_share
                + a.strategy_fund_share;
            assert_eq!(sum, a.total_supply, "raised = {}", raised);
        }
    }

    #[test]
    fn team_pool_is_team_share_minus_members() {
        let a = Allocation::compute(10_000, 1_000, 500_000, 460_784).unwrap();

        assert_eq!(a.team_pool_grant, 1_000_000);
        assert_eq!(
            a.member_one_allocation + a.member_two_allocation + a.team_pool_grant,
            a.team_share
        );
        assert_eq!(
            a.retained_in_vault()
                + a.early_investor_share
                + a.member_one_allocation
                + a.member_two_allocation
                + a.strategy_fund_share,
            a.total_supply
        );
    }

    #[test]
    fn team_pool_exactly_zero_is_allowed() {
        let a = Allocation::compute(10_000, 1_000, 1_000_000, 960_784).unwrap();
        assert_eq!(a.team_pool_grant, 0);
    }

    #[test]
    fn team_share_below_members_is_surfaced() {
        let result = Allocation::compute(10_000, 1_000, 1_000_000, 960_785);
        assert!(matches!(result, Err(SaleError::TeamShareBelowFixedAllocations)));
    }

    #[test]
    fn oversized_supply_overflows() {
        let result = Allocation::compute(u64::MAX, 1_000, 0, 0);
        assert!(matches!(result, Err(SaleError::MathOverflow)));
    }
}
