use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize a new vault for a given asset token
///
/// The asset, lp name/symbol and config manager are fixed for the life of the
/// vault. Also creates the share mint, the vault's asset token account, the
/// share escrow backing queued withdrawals and the withdrawal queue itself.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault owner, stored in state
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Config this vault is bound to for life
    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ConfigState>,

    #[account(
        init,
        payer = owner,
        space = 8 + VaultState::INIT_SPACE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Account<'info, VaultState>,

    /// The underlying token users deposit
    pub asset_mint: Account<'info, Mint>,

    /// Share token mint, decimals mirror the asset
    #[account(
        init,
        payer = owner,
        seeds = [SHARE_MINT_SEED, asset_mint.key().as_ref()],
        bump,
        mint::decimals = asset_mint.decimals,
        mint::authority = vault_authority,
    )]
    pub share_mint: Account<'info, Mint>,

    /// CHECK: PDA used as token and mint authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's asset token account, backs free_amount
    #[account(
        init,
        payer = owner,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Escrow for shares backing queued withdrawal requests
    #[account(
        init,
        payer = owner,
        seeds = [SHARE_ESCROW_SEED, vault_state.key().as_ref()],
        bump,
        token::mint = share_mint,
        token::authority = vault_authority,
    )]
    pub share_escrow: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = owner,
        space = 8 + WithdrawQueue::INIT_SPACE,
        seeds = [WITHDRAW_QUEUE_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub withdraw_queue: Account<'info, WithdrawQueue>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handle_initialize(
    ctx: Context<Initialize>,
    lp_name: String,
    lp_symbol: String,
    min_deposit: u64,
) -> Result<()> {
    require!(lp_name.len() <= MAX_LP_NAME_LEN, VaultError::NameTooLong);
    require!(lp_symbol.len() <= MAX_LP_SYMBOL_LEN, VaultError::NameTooLong);

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.owner = ctx.accounts.owner.key();
    vault_state.pending_owner = Pubkey::default();
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.share_mint = ctx.accounts.share_mint.key();
    vault_state.config_manager = ctx.accounts.config.key();
    vault_state.lp_name = lp_name;
    vault_state.lp_symbol = lp_symbol;
    vault_state.free_amount = 0;
    vault_state.total_lent = 0;
    vault_state.lent_amounts = [0; PROTOCOL_COUNT];
    vault_state.min_deposit = min_deposit;
    vault_state.lending_adapters = [Pubkey::default(); PROTOCOL_COUNT];
    vault_state.vault_managers = Vec::new();
    vault_state.schema_version = VAULT_SCHEMA_VERSION;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.share_bump = ctx.bumps.share_mint;
    vault_state.authority_bump = ctx.bumps.vault_authority;

    let withdraw_queue = &mut ctx.accounts.withdraw_queue;
    withdraw_queue.vault = vault_state.key();
    withdraw_queue.start_index = 0;
    withdraw_queue.end_index = 0;
    withdraw_queue.entries = Vec::new();
    withdraw_queue.bump = ctx.bumps.withdraw_queue;

    emit!(VaultInitialized {
        vault: vault_state.key(),
        owner: vault_state.owner,
        asset_mint: vault_state.asset_mint,
        share_mint: vault_state.share_mint,
        config_manager: vault_state.config_manager,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
