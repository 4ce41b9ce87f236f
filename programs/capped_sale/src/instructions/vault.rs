/**
 * Sale Vault Transfers
 *
 * Every payout leaves the vault through here, after the caller has
 * already committed its bookkeeping.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token::{transfer_checked, Mint, Token, TokenAccount, TransferChecked};

/// Move tokens out of the sale vault, signed by the sale PDA
pub(crate) fn transfer_from_vault<'info>(
    token_program: &Program<'info, Token>,
    mint: &Account<'info, Mint>,
    vault: &Account<'info, TokenAccount>,
    sale: AccountInfo<'info>,
    destination: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault.to_account_info(),
                mint: mint.to_account_info(),
                to: destination,
                authority: sale,
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}
