use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Toggle a vault's permission to call privileged config entry points
///
/// Creates the per-vault config on first use.
#[derive(Accounts)]
pub struct AddVault<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: the vault identity being whitelisted, opaque to the config
    pub vault: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + VaultConfig::INIT_SPACE,
        seeds = [VAULT_CONFIG_SEED, vault.key().as_ref()],
        bump
    )]
    pub vault_config: Account<'info, VaultConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handle_add_vault(ctx: Context<AddVault>, allowed: bool) -> Result<()> {
    require_keys_neq!(
        ctx.accounts.vault.key(),
        Pubkey::default(),
        VaultError::ZeroAddress
    );

    let vault_config = &mut ctx.accounts.vault_config;

    // first use of this vault identity
    if vault_config.vault == Pubkey::default() {
        vault_config.vault = ctx.accounts.vault.key();
        vault_config.pools = Vec::new();
        vault_config.unstake_requests = Vec::new();
        vault_config.bump = ctx.bumps.vault_config;
    }

    vault_config.whitelisted = allowed;

    emit!(VaultWhitelistSet {
        vault: vault_config.vault,
        allowed,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
