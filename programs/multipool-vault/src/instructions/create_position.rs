use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::adapters::ProtocolType;
use crate::{constants::*, errors::*, events::*, state::*};

/// Materialize the vault's position account for a single-endpoint protocol
///
/// Permissionless plumbing: the payer funds the account, its identity is
/// fixed by the PDA seeds and validated against the configured endpoint.
/// Long-tail pool positions are created by add_pool instead.
#[derive(Accounts)]
pub struct CreatePosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub vault_state: Account<'info, VaultState>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: shared endpoint address, validated against config in the handler
    pub market: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + ProtocolPosition::INIT_SPACE,
        seeds = [POSITION_SEED, vault_state.key().as_ref(), market.key().as_ref()],
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
        payer = payer,
        seeds = [MARKET_VAULT_SEED, market.key().as_ref(), asset_mint.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = market_authority,
    )]
    pub market_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handle_create_position(ctx: Context<CreatePosition>, protocol: u8) -> Result<()> {
    let protocol = ProtocolType::try_from(protocol)?;

    let endpoint = match protocol {
        // pool positions come from add_pool
        ProtocolType::Lending => return err!(VaultError::InvalidProtocolType),
        ProtocolType::Liquidity => ctx.accounts.config.lending_pool,
        ProtocolType::Staking => ctx.accounts.config.staking_pool,
    };
    require_keys_neq!(endpoint, Pubkey::default(), VaultError::EndpointNotSet);
    require_keys_eq!(ctx.accounts.market.key(), endpoint, VaultError::WrongMarket);

    let position = &mut ctx.accounts.position;
    position.vault = ctx.accounts.vault_state.key();
    position.market = endpoint;
    position.protocol = protocol as u8;
    position.supplied = 0;
    position.pending_unstake = 0;
    position.bump = ctx.bumps.position;

    emit!(PositionCreated {
        vault: position.vault,
        market: endpoint,
        protocol: protocol as u8,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
