use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

/// Create the global config singleton
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + ConfigState::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, ConfigState>,

    /// CHECK: PDA owning market liquidity token accounts, validated by seeds
    #[account(
        seeds = [MARKET_AUTHORITY_SEED],
        bump
    )]
    pub market_authority: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handle_initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.owner = ctx.accounts.owner.key();
    config.lending_pool = Pubkey::default();
    config.staking_pool = Pubkey::default();
    config.market_authority_bump = ctx.bumps.market_authority;
    config.bump = ctx.bumps.config;

    emit!(ConfigInitialized {
        config: config.key(),
        owner: config.owner,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
