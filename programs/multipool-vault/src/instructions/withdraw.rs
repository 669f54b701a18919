use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Withdraw an exact asset amount or redeem an exact share amount.
///
/// `authority` may be the share owner or an SPL delegate; the token program
/// enforces the allowance on the burn. The entitlement is bounded by the
/// owner's share balance at the current price, not by free_amount — excess
/// demand goes through the withdrawal queue instead.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

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

    /// Share source; its owner is the entitlement holder
    #[account(
        mut,
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    /// Asset destination, may belong to any receiver
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

pub fn handle_withdraw(ctx: Context<Withdraw>, assets: u64) -> Result<()> {
    withdraw_internal(ctx, assets, None)
}

/// Withdraw variant failing with TooMuchSlippage when more than `max_shares`
/// would be burned
pub fn handle_withdraw_with_slippage(
    ctx: Context<Withdraw>,
    assets: u64,
    max_shares: u64,
) -> Result<()> {
    withdraw_internal(ctx, assets, Some(max_shares))
}

pub fn handle_redeem(ctx: Context<Withdraw>, shares: u64) -> Result<()> {
    redeem_internal(ctx, shares, None)
}

/// Redeem variant failing with TooMuchSlippage when fewer than `min_assets`
/// would be paid out
pub fn handle_redeem_with_slippage(
    ctx: Context<Withdraw>,
    shares: u64,
    min_assets: u64,
) -> Result<()> {
    redeem_internal(ctx, shares, Some(min_assets))
}

fn withdraw_internal(ctx: Context<Withdraw>, assets: u64, max_shares: Option<u64>) -> Result<()> {
    let total_supply = ctx.accounts.share_mint.supply;
    let owner_balance = ctx.accounts.owner_share_account.amount;
    let vault_state = &mut ctx.accounts.vault_state;

    let shares = vault_state.checked_withdraw(assets, total_supply, owner_balance, max_shares)?;
    settle_withdraw(&ctx, assets, shares)
}

fn redeem_internal(ctx: Context<Withdraw>, shares: u64, min_assets: Option<u64>) -> Result<()> {
    let total_supply = ctx.accounts.share_mint.supply;
    let owner_balance = ctx.accounts.owner_share_account.amount;
    let vault_state = &mut ctx.accounts.vault_state;

    let assets = vault_state.checked_redeem(shares, total_supply, owner_balance, min_assets)?;
    settle_withdraw(&ctx, assets, shares)
}

/// Burns the shares and pays the assets out
fn settle_withdraw(ctx: &Context<Withdraw>, assets: u64, shares: u64) -> Result<()> {
    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.owner_share_account.to_account_info(),
            authority: ctx.accounts.authority.to_account_info(),
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
        sender: ctx.accounts.authority.key(),
        receiver: ctx.accounts.receiver_asset_account.owner,
        owner: ctx.accounts.owner_share_account.owner,
        assets,
        shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
