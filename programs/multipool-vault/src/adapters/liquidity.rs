use anchor_lang::prelude::*;

use crate::adapters::{AdapterContext, ProtocolAdapter, ProtocolType};
use crate::errors::VaultError;
use crate::state::ProtocolPosition;

/// Action payload for the single shared liquidity pool
///
/// Account tail per action: [position, market_token_account]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum LiquidityAction {
    Supply { amount: u64 },
    Withdraw { amount: u64 },
}

pub struct LiquidityAdapter;

impl ProtocolAdapter for LiquidityAdapter {
    fn execute(ctx: &mut AdapterContext, data: &[u8]) -> Result<u64> {
        let action = LiquidityAction::deserialize(&mut &data[..])
            .map_err(|_| error!(VaultError::InvalidProtocolActionData))?;
        match action {
            LiquidityAction::Supply { amount } => Self::supply(ctx, amount),
            LiquidityAction::Withdraw { amount } => Self::withdraw(ctx, amount),
        }
    }

    fn lent_amount(position: &ProtocolPosition) -> Result<u64> {
        Ok(position.supplied)
    }
}

impl LiquidityAdapter {
    fn endpoint(ctx: &AdapterContext) -> Result<Pubkey> {
        let endpoint = ctx.config.lending_pool;
        require_keys_neq!(endpoint, Pubkey::default(), VaultError::EndpointNotSet);
        Ok(endpoint)
    }

    fn supply(ctx: &mut AdapterContext, amount: u64) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroAssets);
        let endpoint = Self::endpoint(ctx)?;

        let mut position = ctx.next_position(&endpoint, ProtocolType::Liquidity)?;
        let market_token_account = ctx.next_market_token_account(&endpoint)?;

        position.supplied = position
            .supplied
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        ctx.vault_state
            .move_free_to_lent(ProtocolType::Liquidity, amount)?;

        ctx.transfer_to_market(&market_token_account, amount)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }

    fn withdraw(ctx: &mut AdapterContext, amount: u64) -> Result<u64> {
        require!(amount > 0, VaultError::ZeroAssets);
        let endpoint = Self::endpoint(ctx)?;

        let mut position = ctx.next_position(&endpoint, ProtocolType::Liquidity)?;
        let market_token_account = ctx.next_market_token_account(&endpoint)?;

        require_gte!(position.supplied, amount, VaultError::InsufficientLentAmount);
        position.supplied -= amount;
        ctx.vault_state
            .move_lent_to_free(ProtocolType::Liquidity, amount)?;

        ctx.transfer_from_market(&market_token_account, amount)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }
}
