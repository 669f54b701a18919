use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::adapters::ProtocolType;
use crate::{constants::*, errors::*, events::*, state::*};

/// Approve a long-tail pool for a vault
///
/// Also materializes the vault's position in the pool and the pool's
/// liquidity token account.
#[derive(Accounts)]
pub struct AddPool<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [VAULT_CONFIG_SEED, vault_state.key().as_ref()],
        bump = vault_config.bump,
    )]
    pub vault_config: Account<'info, VaultConfig>,

    /// CHECK: external pool address, opaque to the vault
    pub pool: UncheckedAccount<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + ProtocolPosition::INIT_SPACE,
        seeds = [POSITION_SEED, vault_state.key().as_ref(), pool.key().as_ref()],
        bump
    )]
    pub position: Account<'info, ProtocolPosition>,

    #[account(
        address = vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub asset_mint: Account<'info, Mint>,

    /// CHECK: PDA owning market liquidity token accounts, validated by seeds
    #[account(
        seeds = [MARKET_AUTHORITY_SEED],
        bump = config.market_authority_bump,
    )]
    pub market_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        seeds = [MARKET_VAULT_SEED, pool.key().as_ref(), asset_mint.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = market_authority,
    )]
    pub market_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Drop an approved pool, identified by its index in the pool set
#[derive(Accounts)]
pub struct RemovePool<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [VAULT_CONFIG_SEED, vault_state.key().as_ref()],
        bump = vault_config.bump,
    )]
    pub vault_config: Account<'info, VaultConfig>,

    /// Position of the removed pool; closed once it is verifiably empty
    #[account(mut, close = owner)]
    pub position: Account<'info, ProtocolPosition>,
}

/// Set the single shared liquidity-pool endpoint
#[derive(Accounts)]
pub struct SetLendingPool<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: external endpoint address, opaque to the vault
    pub pool: UncheckedAccount<'info>,
}

/// Set the single shared liquid-staking endpoint
#[derive(Accounts)]
pub struct SetStakingPool<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: external endpoint address, opaque to the vault
    pub pool: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + StakingPoolState::INIT_SPACE,
        seeds = [STAKING_POOL_SEED, pool.key().as_ref()],
        bump
    )]
    pub staking_state: Account<'info, StakingPoolState>,

    pub system_program: Program<'info, System>,
}

pub fn handle_add_pool(ctx: Context<AddPool>) -> Result<()> {
    let pool = ctx.accounts.pool.key();
    ctx.accounts.vault_config.add_pool(pool)?;

    let position = &mut ctx.accounts.position;
    position.vault = ctx.accounts.vault_state.key();
    position.market = pool;
    position.protocol = ProtocolType::Lending as u8;
    position.supplied = 0;
    position.pending_unstake = 0;
    position.bump = ctx.bumps.position;

    emit!(PoolAdded {
        vault: ctx.accounts.vault_state.key(),
        pool,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn handle_remove_pool(ctx: Context<RemovePool>, index: u32) -> Result<()> {
    let pool = ctx.accounts.vault_config.pool_at(index as usize)?;

    let position = &ctx.accounts.position;
    require_keys_eq!(
        position.vault,
        ctx.accounts.vault_state.key(),
        VaultError::WrongPosition
    );
    require_keys_eq!(position.market, pool, VaultError::WrongPosition);
    // funds must be pulled out before the pool can be dropped
    require!(position.is_empty(), VaultError::VaultHasPositionInPool);

    ctx.accounts.vault_config.remove_pool(index as usize)?;

    emit!(PoolRemoved {
        vault: ctx.accounts.vault_state.key(),
        pool,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn handle_set_lending_pool(ctx: Context<SetLendingPool>) -> Result<()> {
    let pool = ctx.accounts.pool.key();
    require_keys_neq!(pool, Pubkey::default(), VaultError::ZeroAddress);

    ctx.accounts.config.lending_pool = pool;

    emit!(LendingPoolSet {
        pool,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn handle_set_staking_pool(ctx: Context<SetStakingPool>) -> Result<()> {
    let pool = ctx.accounts.pool.key();
    require_keys_neq!(pool, Pubkey::default(), VaultError::ZeroAddress);

    ctx.accounts.config.staking_pool = pool;

    let staking_state = &mut ctx.accounts.staking_state;
    if staking_state.market == Pubkey::default() {
        staking_state.market = pool;
        staking_state.next_request_id = 1;
        staking_state.finalized_up_to = 0;
        staking_state.bump = ctx.bumps.staking_state;
    }

    emit!(StakingPoolSet {
        pool,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
