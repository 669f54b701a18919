use anchor_lang::prelude::*;

use crate::adapters::ProtocolType;
use crate::{constants::*, errors::*, events::*, state::*};

/// Owner-only vault administration
#[derive(Accounts)]
pub struct VaultAdmin<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

/// Bind an adapter to a protocol slot
///
/// Endpoint protocols require the shared endpoint configured and the vault's
/// position account materialized before binding.
#[derive(Accounts)]
pub struct AddLendingAdapter<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ConfigState>,

    /// Position for the slot's endpoint; required for endpoint protocols
    pub position: Option<Account<'info, ProtocolPosition>>,
}

#[derive(Accounts)]
pub struct AcceptOwnership<'info> {
    pub pending_owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,
}

pub fn handle_set_min_deposit(ctx: Context<VaultAdmin>, min_deposit: u64) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.min_deposit = min_deposit;

    emit!(MinDepositSet {
        vault: vault_state.key(),
        min_deposit,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn handle_add_vault_manager(
    ctx: Context<VaultAdmin>,
    manager: Pubkey,
    enabled: bool,
) -> Result<()> {
    require_keys_neq!(manager, Pubkey::default(), VaultError::ZeroAddress);

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_vault_manager(manager, enabled)?;

    emit!(VaultManagerSet {
        vault: vault_state.key(),
        manager,
        enabled,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn handle_add_lending_adapter(
    ctx: Context<AddLendingAdapter>,
    protocol: u8,
    adapter: Pubkey,
) -> Result<()> {
    let protocol = ProtocolType::try_from(protocol)?;
    let vault_state = &mut ctx.accounts.vault_state;

    match protocol {
        ProtocolType::Lending => {}
        ProtocolType::Liquidity | ProtocolType::Staking => {
            let endpoint = match protocol {
                ProtocolType::Liquidity => ctx.accounts.config.lending_pool,
                _ => ctx.accounts.config.staking_pool,
            };
            require_keys_neq!(endpoint, Pubkey::default(), VaultError::EndpointNotSet);

            let position = ctx
                .accounts
                .position
                .as_ref()
                .ok_or(error!(VaultError::MissingAdapterAccounts))?;
            require_keys_eq!(position.vault, vault_state.key(), VaultError::WrongPosition);
            require_keys_eq!(position.market, endpoint, VaultError::WrongPosition);
            require!(
                position.protocol == protocol as u8,
                VaultError::WrongPosition
            );
        }
    }

    vault_state.set_adapter(protocol, adapter)?;

    emit!(LendingAdapterSet {
        vault: vault_state.key(),
        protocol: protocol as u8,
        adapter,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// First step of the two-step ownership transfer
pub fn handle_transfer_ownership(ctx: Context<VaultAdmin>, new_owner: Pubkey) -> Result<()> {
    require_keys_neq!(new_owner, Pubkey::default(), VaultError::ZeroAddress);

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.pending_owner = new_owner;

    emit!(OwnershipTransferStarted {
        vault: vault_state.key(),
        owner: vault_state.owner,
        pending_owner: new_owner,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Second step: only the pending owner may accept
pub fn handle_accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    require_keys_eq!(
        vault_state.pending_owner,
        ctx.accounts.pending_owner.key(),
        VaultError::SenderIsNotPendingOwner
    );

    let previous_owner = vault_state.owner;
    vault_state.owner = vault_state.pending_owner;
    vault_state.pending_owner = Pubkey::default();

    emit!(OwnershipTransferred {
        vault: vault_state.key(),
        previous_owner,
        new_owner: vault_state.owner,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

/// Walk the persisted schema forward to the current version
pub fn handle_migrate_vault(ctx: Context<VaultAdmin>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    let from_version = vault_state.migrate_schema()?;

    emit!(VaultMigrated {
        vault: vault_state.key(),
        from_version,
        to_version: vault_state.schema_version,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
