use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::adapters::{self, AdapterContext, ProtocolAction};
use crate::{constants::*, errors::*, events::*, state::*};

/// Execute a batch of protocol actions against the bound adapters
///
/// Actions dispatch in order; the whole batch is atomic, so a failing action
/// reverts every previous one. Adapter account tails ride in
/// remaining_accounts and are consumed in action order.
#[derive(Accounts)]
pub struct ExecuteProtocolAction<'info> {
    pub manager: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [VAULT_CONFIG_SEED, vault_state.key().as_ref()],
        bump = vault_config.bump,
    )]
    pub vault_config: Account<'info, VaultConfig>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: PDA used as transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// CHECK: PDA owning market liquidity token accounts, validated by seeds
    #[account(
        seeds = [MARKET_AUTHORITY_SEED],
        bump = config.market_authority_bump,
    )]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handle_execute_protocol_action<'info>(
    ctx: Context<'_, '_, 'info, 'info, ExecuteProtocolAction<'info>>,
    actions: Vec<ProtocolAction>,
) -> Result<()> {
    require!(
        ctx.accounts
            .vault_state
            .is_vault_manager(&ctx.accounts.manager.key()),
        VaultError::SenderIsNotVaultManager
    );

    let vault_key = ctx.accounts.vault_state.key();
    let vault_authority = ctx.accounts.vault_authority.to_account_info();
    let vault_token_account = ctx.accounts.vault_token_account.to_account_info();
    let market_authority = ctx.accounts.market_authority.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    let mut adapter_ctx = AdapterContext::new(
        vault_key,
        &mut ctx.accounts.vault_state,
        &mut ctx.accounts.vault_config,
        &ctx.accounts.config,
        vault_authority,
        vault_token_account,
        market_authority,
        token_program,
        ctx.remaining_accounts,
    );

    for action in &actions {
        let amount = adapters::dispatch(&mut adapter_ctx, action)?;

        emit!(ProtocolActionExecuted {
            vault: vault_key,
            protocol: action.protocol as u8,
            amount,
            timestamp: Clock::get()?.unix_timestamp,
        });
    }

    Ok(())
}
