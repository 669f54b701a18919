use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Deposit assets into the vault for shares, or mint an exact share amount.
///
/// Share math uses the cached total_assets; callers needing exact pricing
/// must run update_total_lent first.
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

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

    /// CHECK: PDA used as mint authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    /// Share destination, may belong to any receiver
    #[account(
        mut,
        constraint = receiver_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub receiver_share_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handle_deposit(ctx: Context<Deposit>, assets: u64) -> Result<()> {
    deposit_internal(ctx, assets, None)
}

/// Deposit variant failing with TooMuchSlippage when fewer than `min_shares`
/// would be minted
pub fn handle_deposit_with_slippage(
    ctx: Context<Deposit>,
    assets: u64,
    min_shares: u64,
) -> Result<()> {
    deposit_internal(ctx, assets, Some(min_shares))
}

pub fn handle_mint_shares(ctx: Context<Deposit>, shares: u64) -> Result<()> {
    mint_internal(ctx, shares, None)
}

/// Mint variant failing with TooMuchSlippage when more than `max_assets`
/// would be collected
pub fn handle_mint_shares_with_slippage(
    ctx: Context<Deposit>,
    shares: u64,
    max_assets: u64,
) -> Result<()> {
    mint_internal(ctx, shares, Some(max_assets))
}

fn deposit_internal(ctx: Context<Deposit>, assets: u64, min_shares: Option<u64>) -> Result<()> {
    let total_supply = ctx.accounts.share_mint.supply;
    let vault_state = &mut ctx.accounts.vault_state;

    let shares = vault_state.checked_deposit(assets, total_supply, min_shares)?;
    settle_deposit(&ctx, assets, shares)
}

fn mint_internal(ctx: Context<Deposit>, shares: u64, max_assets: Option<u64>) -> Result<()> {
    let total_supply = ctx.accounts.share_mint.supply;
    let vault_state = &mut ctx.accounts.vault_state;

    let assets = vault_state.checked_mint(shares, total_supply, max_assets)?;
    settle_deposit(&ctx, assets, shares)
}

/// Moves the assets in, mints the shares out and emits the audit event
fn settle_deposit(ctx: &Context<Deposit>, assets: u64, shares: u64) -> Result<()> {
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_asset_account.to_account_info(),
            to: ctx.accounts.vault_token_account.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, assets)?;

    let asset_mint_key = ctx.accounts.vault_state.asset_mint;
    let authority_bump = ctx.accounts.vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.receiver_share_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, shares)?;

    emit!(Deposited {
        vault: ctx.accounts.vault_state.key(),
        sender: ctx.accounts.user.key(),
        owner: ctx.accounts.receiver_share_account.owner,
        assets,
        shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
