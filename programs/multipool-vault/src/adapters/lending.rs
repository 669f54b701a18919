use anchor_lang::prelude::*;

use crate::adapters::{AdapterContext, ProtocolAdapter, ProtocolType};
use crate::errors::VaultError;
use crate::state::ProtocolPosition;

/// Action payload for the long-tail lending pools
///
/// Account tail per action: [position, market_token_account]
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum LendingAction {
    Deposit { pool: Pubkey, amount: u64 },
    Withdraw { pool: Pubkey, amount: u64 },
}

pub struct LendingAdapter;

impl ProtocolAdapter for LendingAdapter {
    fn execute(ctx: &mut AdapterContext, data: &[u8]) -> Result<u64> {
        let action = LendingAction::deserialize(&mut &data[..])
            .map_err(|_| error!(VaultError::InvalidProtocolActionData))?;
        match action {
            LendingAction::Deposit { pool, amount } => Self::deposit(ctx, pool, amount),
            LendingAction::Withdraw { pool, amount } => Self::withdraw(ctx, pool, amount),
        }
    }

    fn lent_amount(position: &ProtocolPosition) -> Result<u64> {
        Ok(position.supplied)
    }
}

impl LendingAdapter {
    fn deposit(ctx: &mut AdapterContext, pool: Pubkey, amount: u64) -> Result<u64> {
        require!(
            ctx.vault_config.is_pool_approved(&pool),
            VaultError::UnknownPool
        );
        require!(amount > 0, VaultError::ZeroAssets);

        let mut position = ctx.next_position(&pool, ProtocolType::Lending)?;
        let market_token_account = ctx.next_market_token_account(&pool)?;

        position.supplied = position
            .supplied
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        ctx.vault_state.move_free_to_lent(ProtocolType::Lending, amount)?;

        ctx.transfer_to_market(&market_token_account, amount)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }

    fn withdraw(ctx: &mut AdapterContext, pool: Pubkey, amount: u64) -> Result<u64> {
        require!(
            ctx.vault_config.is_pool_approved(&pool),
            VaultError::UnknownPool
        );
        require!(amount > 0, VaultError::ZeroAssets);

        let mut position = ctx.next_position(&pool, ProtocolType::Lending)?;
        let market_token_account = ctx.next_market_token_account(&pool)?;

        require_gte!(position.supplied, amount, VaultError::InsufficientLentAmount);
        position.supplied -= amount;
        ctx.vault_state.move_lent_to_free(ProtocolType::Lending, amount)?;

        ctx.transfer_from_market(&market_token_account, amount)?;
        position.exit(&crate::ID)?;
        Ok(amount)
    }
}
