use anchor_lang::prelude::*;

use crate::adapters::{AdapterContext, ProtocolAdapter, ProtocolType};
use crate::errors::VaultError;
use crate::state::ProtocolPosition;

/// Action payload for the liquid-staking pool
///
/// The exit flow is split in two: `RequestUnstake` obtains a request id from
/// the protocol and parks it in the vault's config queue, `ClaimUnstake`
/// settles the head of that queue once the external protocol has finalized it.
///
/// Account tails: Stake [position, market_token_account],
/// RequestUnstake [position, staking_state],
/// ClaimUnstake [position, staking_state, market_token_account]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum StakingAction {
    Stake { amount: u64 },
    RequestUnstake { amount: u64 },
    ClaimUnstake,
}

pub struct StakingAdapter;

impl ProtocolAdapter for StakingAdapter {
    fn execute(ctx: &mut AdapterContext, data: &[u8]) -> Result<u64> {
        let action = StakingAction::deserialize(&mut &data[..])
            .map_err(|_| error!(VaultError::InvalidProtocolActionData))?;
        match action {
            StakingAction::Stake { amount } => Self::stake(ctx, amount),
            StakingAction::RequestUnstake { amount } => Self::request_unstake(ctx, amount),
            StakingAction::ClaimUnstake => Self::claim_unstake(ctx),
        }
    }

    fn lent_amount(position: &ProtocolPosition) -> Result<u64> {
        // assets awaiting claim are still the vault's
        position.lent_amount()
    }
}

impl StakingAdapter {
    fn endpoint(ctx: &AdapterContext) -> Result<Pubkey> {
        let endpoint = ctx.config.staking_pool;
        require_keys_neq!(endpoint, Pubkey::default(), VaultError::EndpointNotSet);
        Ok(endpoint)
    }

    fn stake(ctx: &mut AdapterContext, amount: u64) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroAssets);
        let endpoint = Self::endpoint(ctx)?;

        let mut position = ctx.next_position(&endpoint, ProtocolType::Staking)?;
        let market_token_account = ctx.next_market_token_account(&endpoint)?;

        position.supplied = position
            .supplied
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        ctx.vault_state
            .move_free_to_lent(ProtocolType::Staking, amount)?;

        ctx.transfer_to_market(&market_token_account, amount)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }

    /// Asks the protocol to unstake and parks the issued request id in the
    /// vault's config queue. No assets move until the claim.
    fn request_unstake(ctx: &mut AdapterContext, amount: u64) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroAssets);
        // the config queue is a privileged surface
        require!(ctx.vault_config.whitelisted, VaultError::SenderIsNotVault);
        let endpoint = Self::endpoint(ctx)?;

        let mut position = ctx.next_position(&endpoint, ProtocolType::Staking)?;
        let mut staking_state = ctx.next_staking_state(&endpoint)?;

        require_gte!(position.supplied, amount, VaultError::InsufficientLentAmount);
        position.supplied -= amount;
        position.pending_unstake = position
            .pending_unstake
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        let request_id = staking_state.next_request_id;
        staking_state.next_request_id = request_id
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        ctx.vault_config.enqueue_unstake_request(request_id, amount)?;

        staking_state.exit(&crate::ID)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }

    /// Settles the head of the unstake queue once the protocol reports it
    /// finalized, returning the assets to the vault
    fn claim_unstake(ctx: &mut AdapterContext) -> Result<u64> {
        require!(ctx.vault_config.whitelisted, VaultError::SenderIsNotVault);
        let endpoint = Self::endpoint(ctx)?;

        let mut position = ctx.next_position(&endpoint, ProtocolType::Staking)?;
        let staking_state = ctx.next_staking_state(&endpoint)?;
        let market_token_account = ctx.next_market_token_account(&endpoint)?;

        let head = ctx.vault_config.peek_unstake_request()?;
        require_gte!(
            staking_state.finalized_up_to,
            head.request_id,
            VaultError::UnstakeRequestNotFinalized
        );
        let request = ctx.vault_config.dequeue_unstake_request()?;

        require_gte!(
            position.pending_unstake,
            request.amount,
            VaultError::InsufficientLentAmount
        );
        position.pending_unstake -= request.amount;
        ctx.vault_state
            .move_lent_to_free(ProtocolType::Staking, request.amount)?;

        ctx.transfer_from_market(&market_token_account, request.amount)?;
        position.exit(&crate::ID)?;
        Ok(request.amount)
    }
}
