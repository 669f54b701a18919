use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Pay out the head of the withdrawal queue
///
/// Vault managers drain the queue as liquidity frees up. Only the request at
/// start_index can be finalized; an empty queue and insufficient liquidity
/// are distinct failures, and neither mutates state.
#[derive(Accounts)]
pub struct FinalizeWithdrawRequest<'info> {
    pub manager: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [WITHDRAW_QUEUE_SEED, vault_state.key().as_ref()],
        bump = withdraw_queue.bump,
    )]
    pub withdraw_queue: Account<'info, WithdrawQueue>,

    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Vault-owned escrow the queued shares were parked in
    #[account(
        mut,
        seeds = [SHARE_ESCROW_SEED, vault_state.key().as_ref()],
        bump,
    )]
    pub share_escrow: Account<'info, TokenAccount>,

    /// CHECK: PDA used as burn and transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Asset destination of the original requester
    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub receiver_asset_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handle_finalize_withdraw_request(ctx: Context<FinalizeWithdrawRequest>) -> Result<()> {
    require!(
        ctx.accounts
            .vault_state
            .is_vault_manager(&ctx.accounts.manager.key()),
        VaultError::SenderIsNotVaultManager
    );

    let total_supply = ctx.accounts.share_mint.supply;
    let finalized = ctx
        .accounts
        .withdraw_queue
        .finalize(&mut ctx.accounts.vault_state, total_supply)?;

    // assets go to the original requester, whoever triggered finalization
    require_keys_eq!(
        ctx.accounts.receiver_asset_account.owner,
        finalized.owner,
        VaultError::InvalidOwner
    );

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let burn_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.share_escrow.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::burn(burn_ctx, finalized.shares)?;

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_token_account.to_account_info(),
            to: ctx.accounts.receiver_asset_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, finalized.assets)?;

    emit!(WithdrawRequestFinalized {
        vault: ctx.accounts.vault_state.key(),
        owner: finalized.owner,
        request_id: finalized.request_id,
        shares: finalized.shares,
        assets: finalized.assets,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
