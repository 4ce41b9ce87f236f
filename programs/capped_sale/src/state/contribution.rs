/**
 * Contribution Record State
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::SaleError;

/// Per-participant contribution record
/// One PDA per (sale, participant)
#[account]
pub struct Contribution {
    /// Sale this record belongs to
    pub sale: Pubkey,

    /// Wallet that contributed
    pub participant: Pubkey,

    /// Cumulative lamports contributed, zeroed once paid out
    pub amount: u64,

    /// Tokens paid out for this record (lifetime)
    pub claimed: u64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl Contribution {
    pub const LEN: usize = 8 + // discriminator
        32 + // sale
        32 + // participant
        8 +  // amount
        8 +  // claimed
        1;   // bump

    /// Consume the record for a purchase payout.
    ///
    /// Returns the tokens owed and zeroes the record before any transfer
    /// is made. A second call returns 0.
    pub fn take_payout(&mut self, token_price_multiplier: u64) -> std::result::Result<u64, SaleError> {
        if self.amount == 0 {
            return Ok(0);
        }

        let owed = self
            .amount
            .checked_mul(token_price_multiplier)
            .ok_or(SaleError::MathOverflow)?;
        let claimed = self
            .claimed
            .checked_add(owed)
            .ok_or(SaleError::MathOverflow)?;

        self.amount = 0;
        self.claimed = claimed;
        Ok(owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: u64) -> Contribution {
        Contribution {
            sale: Pubkey::new_unique(),
            participant: Pubkey::new_unique(),
            amount,
            claimed: 0,
            bump: 255,
        }
    }

    #[test]
    fn payout_zeroes_record_once() {
        let mut c = record(10_000);

        assert_eq!(c.take_payout(1_000).unwrap(), 10_000_000);
        assert_eq!(c.amount, 0);
        assert_eq!(c.claimed, 10_000_000);

        assert_eq!(c.take_payout(1_000).unwrap(), 0);
        assert_eq!(c.claimed, 10_000_000);
    }

    #[test]
    fn payout_overflow_leaves_record_untouched() {
        let mut c = record(u64::MAX);

        assert!(matches!(c.take_payout(2), Err(SaleError::MathOverflow)));
        assert_eq!(c.amount, u64::MAX);
        assert_eq!(c.claimed, 0);
    }
}
