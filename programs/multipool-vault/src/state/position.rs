use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// The vault's position in one external market, keyed by
/// PDA(vault_state, market)
///
/// Adapters mutate it when moving funds; `update_total_lent` re-reads it as
/// the protocol's report of the currently-lent amount.
#[account]
#[derive(InitSpace)]
pub struct ProtocolPosition {
    pub vault: Pubkey,
    pub market: Pubkey,
    pub protocol: u8,

    /// Assets currently supplied to the market
    pub supplied: u64,

    /// Assets exiting through the protocol's async-unstake flow; still owned
    /// by the vault until claimed
    pub pending_unstake: u64,

    pub bump: u8,
}

impl ProtocolPosition {
    pub fn lent_amount(&self) -> Result<u64> {
        self.supplied
            .checked_add(self.pending_unstake)
            .ok_or(error!(VaultError::MathOverflow))
    }

    pub fn is_empty(&self) -> bool {
        self.supplied == 0 && self.pending_unstake == 0
    }
}

/// Per-staking-market request counter and settlement watermark
///
/// `finalized_up_to` stands in for the external protocol's settlement signal:
/// requests with `id <= finalized_up_to` can be claimed.
#[account]
#[derive(InitSpace)]
pub struct StakingPoolState {
    pub market: Pubkey,

    /// Id handed to the next unstake request, starts at 1
    pub next_request_id: u64,

    /// Highest request id settled by the external protocol
    pub finalized_up_to: u64,

    pub bump: u8,
}
