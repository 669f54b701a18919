use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Request redemption of `shares`. Resolves immediately when free_amount
/// covers the owed assets; otherwise the shares are escrowed and the request
/// is appended at the tail of the withdrawal queue.
#[derive(Accounts)]
pub struct RequestWithdraw<'info> {
    pub owner: Signer<'info>,

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

    /// CHECK: PDA used as transfer authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = owner_share_account.owner == owner.key() @ VaultError::InvalidOwner,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    /// Vault-owned escrow holding shares of queued requests
    #[account(
        mut,
        seeds = [SHARE_ESCROW_SEED, vault_state.key().as_ref()],
        bump,
    )]
    pub share_escrow: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = receiver_asset_account.owner == owner.key() @ VaultError::InvalidOwner,
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

pub fn handle_request_withdraw(ctx: Context<RequestWithdraw>, shares: u64) -> Result<()> {
    require!(shares > 0, VaultError::ZeroShares);

    let total_supply = ctx.accounts.share_mint.supply;
    let owner_balance = ctx.accounts.owner_share_account.amount;
    require_gte!(owner_balance, shares, VaultError::ExceededMaxRedeem);

    let owed_assets = ctx
        .accounts
        .vault_state
        .convert_to_assets(shares, total_supply)?;

    if ctx.accounts.vault_state.free_amount >= owed_assets {
        // enough liquidity, resolve immediately and skip escrow entirely
        let assets = ctx.accounts.vault_state.checked_redeem(
            shares,
            total_supply,
            owner_balance,
            None,
        )?;

        let burn_ctx = CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.share_mint.to_account_info(),
                from: ctx.accounts.owner_share_account.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        );
        token::burn(burn_ctx, shares)?;

        let asset_mint_key = ctx.accounts.vault_state.asset_mint;
        let authority_bump = ctx.accounts.vault_state.authority_bump;
        let authority_seeds: &[&[u8]] = &[
            VAULT_AUTHORITY_SEED,
            asset_mint_key.as_ref(),
            &[authority_bump],
        ];
        let signer_seeds = &[&authority_seeds[..]];

        let transfer_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_token_account.to_account_info(),
                to: ctx.accounts.receiver_asset_account.to_account_info(),
                authority: ctx.accounts.vault_authority.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(transfer_ctx, assets)?;

        emit!(Withdrawn {
            vault: ctx.accounts.vault_state.key(),
            sender: ctx.accounts.owner.key(),
            receiver: ctx.accounts.owner.key(),
            owner: ctx.accounts.owner.key(),
            assets,
            shares,
            timestamp: Clock::get()?.unix_timestamp,
        });
        return Ok(());
    }

    // shares move into vault-owned escrow until the queue head is finalized
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.owner_share_account.to_account_info(),
            to: ctx.accounts.share_escrow.to_account_info(),
            authority: ctx.accounts.owner.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, shares)?;

    let request_id = ctx
        .accounts
        .withdraw_queue
        .push(ctx.accounts.owner.key(), shares)?;

    emit!(WithdrawRequestCreated {
        vault: ctx.accounts.vault_state.key(),
        owner: ctx.accounts.owner.key(),
        request_id,
        shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
