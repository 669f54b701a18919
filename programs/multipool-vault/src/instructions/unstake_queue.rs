use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Unstake-request queue access, restricted to the owning vault identity
///
/// Authorization is "am I the vault this queue belongs to": the signer's key
/// derives the config PDA and must be whitelisted. The queue is a per-vault
/// operational artifact, not an admin-configured one.
#[derive(Accounts)]
pub struct QueueAccess<'info> {
    pub vault: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_CONFIG_SEED, vault.key().as_ref()],
        bump = vault_config.bump,
    )]
    pub vault_config: Account<'info, VaultConfig>,
}

/// Advance the external settlement watermark of a staking market
#[derive(Accounts)]
pub struct FinalizeUnstakeRequests<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, staking_state.market.as_ref()],
        bump = staking_state.bump,
    )]
    pub staking_state: Account<'info, StakingPoolState>,
}

pub fn handle_enqueue_unstake_request(
    ctx: Context<QueueAccess>,
    request_id: u64,
    amount: u64,
) -> Result<()> {
    let vault_config = &mut ctx.accounts.vault_config;
    require!(vault_config.whitelisted, VaultError::SenderIsNotVault);

    vault_config.enqueue_unstake_request(request_id, amount)?;

    emit!(UnstakeRequestEnqueued {
        vault: vault_config.vault,
        request_id,
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Dequeues the head, returning its request id
pub fn handle_dequeue_unstake_request(ctx: Context<QueueAccess>) -> Result<u64> {
    let vault_config = &mut ctx.accounts.vault_config;
    require!(vault_config.whitelisted, VaultError::SenderIsNotVault);

    let request = vault_config.dequeue_unstake_request()?;

    emit!(UnstakeRequestDequeued {
        vault: vault_config.vault,
        request_id: request.request_id,
        amount: request.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(request.request_id)
}

/// Records which request ids the external protocol has settled. The watermark
/// only moves forward and never past an issued id.
pub fn handle_mark_unstake_requests_finalized(
    ctx: Context<FinalizeUnstakeRequests>,
    up_to: u64,
) -> Result<()> {
    let staking_state = &mut ctx.accounts.staking_state;
    require!(
        up_to < staking_state.next_request_id,
        VaultError::InvalidRequestId
    );
    require_gte!(
        up_to,
        staking_state.finalized_up_to,
        VaultError::InvalidRequestId
    );

    staking_state.finalized_up_to = up_to;

    emit!(UnstakeRequestsFinalized {
        staking_pool: staking_state.market,
        finalized_up_to: up_to,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
