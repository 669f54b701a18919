use anchor_lang::prelude::*;

use crate::adapters::{self, ProtocolType};
use crate::{constants::*, errors::*, events::*, state::*};

/// Re-query every bound adapter's positions and overwrite the lent caches
///
/// Deliberately a separate, explicit step: querying all positions is not free
/// and some protocols' reported amounts settle just in time, so callers
/// needing exact pricing run this immediately before a price-sensitive
/// operation. Permissionless.
///
/// Position accounts arrive in remaining_accounts in deterministic order:
/// every approved pool, then the liquidity endpoint, then the staking
/// endpoint — only for slots with a bound adapter. The handler verifies
/// identity and count, so a partial list cannot undercount total_lent.
#[derive(Accounts)]
pub struct UpdateTotalLent<'info> {
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        seeds = [VAULT_CONFIG_SEED, vault_state.key().as_ref()],
        bump = vault_config.bump,
    )]
    pub vault_config: Account<'info, VaultConfig>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ConfigState>,
}

pub fn handle_update_total_lent<'info>(
    ctx: Context<'_, '_, 'info, 'info, UpdateTotalLent<'info>>,
) -> Result<()> {
    let vault_key = ctx.accounts.vault_state.key();

    let mut expected: Vec<(ProtocolType, Pubkey)> = Vec::new();
    {
        let vault_state = &ctx.accounts.vault_state;
        let config = &ctx.accounts.config;

        if vault_state.lending_adapters[ProtocolType::Lending as usize] != Pubkey::default() {
            for pool_config in &ctx.accounts.vault_config.pools {
                expected.push((ProtocolType::Lending, pool_config.pool));
            }
        }
        if vault_state.lending_adapters[ProtocolType::Liquidity as usize] != Pubkey::default() {
            require_keys_neq!(
                config.lending_pool,
                Pubkey::default(),
                VaultError::EndpointNotSet
            );
            expected.push((ProtocolType::Liquidity, config.lending_pool));
        }
        if vault_state.lending_adapters[ProtocolType::Staking as usize] != Pubkey::default() {
            require_keys_neq!(
                config.staking_pool,
                Pubkey::default(),
                VaultError::EndpointNotSet
            );
            expected.push((ProtocolType::Staking, config.staking_pool));
        }
    }

    require!(
        ctx.remaining_accounts.len() == expected.len(),
        VaultError::MissingAdapterAccounts
    );

    let mut lent_amounts = [0u64; PROTOCOL_COUNT];
    for (info, (protocol, market)) in ctx.remaining_accounts.iter().zip(expected.iter()) {
        let position: Account<ProtocolPosition> = Account::try_from(info)?;
        require_keys_eq!(position.vault, vault_key, VaultError::WrongPosition);
        require_keys_eq!(position.market, *market, VaultError::WrongPosition);
        require!(
            position.protocol == *protocol as u8,
            VaultError::WrongPosition
        );

        let amount = adapters::reported_lent_amount(&position)?;
        let slot = &mut lent_amounts[*protocol as usize];
        *slot = slot.checked_add(amount).ok_or(VaultError::MathOverflow)?;
    }

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_lent_amounts(lent_amounts)?;

    emit!(TotalLentUpdated {
        vault: vault_key,
        total_lent: vault_state.total_lent,
        lent_amounts,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
